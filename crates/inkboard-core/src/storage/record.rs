//! Persisted shape records.
//!
//! One flat record per shape. Geometric shapes store their anchors as four
//! coordinates; freehand strokes store their points as `"x,y;x,y;..."`. The
//! smoothed path is never stored and is rebuilt on decode.

use crate::shapes::{ArgbColor, FreeHand, Geometric, Shape};
use crate::tools::Tool;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Discriminator for freehand strokes. Geometric shapes use their tool name.
pub const FREEHAND_KIND: &str = "FREEHAND";

/// Errors decoding a single record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Unknown shape type: {0}")]
    UnknownKind(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid point list entry: {0:?}")]
    InvalidPoint(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// 32-bit ARGB.
    pub color: u32,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<String>,
    /// Tool that drew a freehand stroke. Absent means pen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        match shape {
            Shape::FreeHand(stroke) => Self {
                id: stroke.id().to_string(),
                kind: FREEHAND_KIND.to_string(),
                color: stroke.color.0,
                stroke_width: stroke.stroke_width,
                start_x: None,
                start_y: None,
                end_x: None,
                end_y: None,
                points: Some(encode_points(stroke.points())),
                tool: Some(stroke.tool.as_str().to_string()),
            },
            Shape::Geometric(g) => Self {
                id: g.id().to_string(),
                kind: g.tool.as_str().to_string(),
                color: g.color.0,
                stroke_width: g.stroke_width,
                start_x: Some(g.start.x),
                start_y: Some(g.start.y),
                end_x: Some(g.end.x),
                end_y: Some(g.end.y),
                points: None,
                tool: None,
            },
        }
    }
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = RecordError;

    fn try_from(record: ShapeRecord) -> Result<Self, Self::Error> {
        // Older saves used numeric ids; give those a fresh identity.
        let id = Uuid::parse_str(&record.id)
            .ok()
            .filter(|id| !id.is_nil())
            .unwrap_or_else(Uuid::new_v4);
        let color = ArgbColor(record.color);

        if record.kind == FREEHAND_KIND {
            let tool = match record.tool.as_deref() {
                None => Tool::Pen,
                Some(name) => name
                    .parse::<Tool>()
                    .ok()
                    .filter(|tool| tool.is_freehand())
                    .ok_or_else(|| RecordError::UnknownTool(name.to_string()))?,
            };
            let points = decode_points(record.points.as_deref().unwrap_or_default())?;
            return Ok(Shape::FreeHand(FreeHand::new(
                id,
                color,
                record.stroke_width,
                tool,
                points,
            )));
        }

        let tool = record
            .kind
            .parse::<Tool>()
            .ok()
            .filter(|tool| tool.is_shape())
            .ok_or_else(|| RecordError::UnknownKind(record.kind.clone()))?;
        let start = Point::new(
            record.start_x.unwrap_or_default(),
            record.start_y.unwrap_or_default(),
        );
        let end = Point::new(
            record.end_x.unwrap_or_default(),
            record.end_y.unwrap_or_default(),
        );
        Ok(Shape::Geometric(Geometric::new(
            id,
            color,
            record.stroke_width,
            tool,
            start,
            end,
        )))
    }
}

/// Serialize points as `"x,y;x,y;..."`.
pub fn encode_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(";")
}

/// Parse a `"x,y;x,y;..."` point list. Empty segments are skipped.
pub fn decode_points(encoded: &str) -> Result<Vec<Point>, RecordError> {
    encoded
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| RecordError::InvalidPoint(pair.to_string()))?;
            match (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
                (Ok(x), Ok(y)) => Ok(Point::new(x, y)),
                _ => Err(RecordError::InvalidPoint(pair.to_string())),
            }
        })
        .collect()
}

pub fn to_records(shapes: &[Shape]) -> Vec<ShapeRecord> {
    shapes.iter().map(ShapeRecord::from).collect()
}

/// Decode records, dropping (and logging) any that can't be read.
pub fn from_records(records: Vec<ShapeRecord>) -> Vec<Shape> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            Shape::try_from(record)
                .map_err(|e| log::warn!("Skipping stored shape {}: {}", id, e))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry;

    #[test]
    fn test_point_list_format() {
        let points = [Point::new(0.0, 0.0), Point::new(10.5, -3.0)];
        assert_eq!(encode_points(&points), "0,0;10.5,-3");
        assert_eq!(decode_points("0,0;10.5,-3").unwrap(), points);
        assert_eq!(decode_points("").unwrap(), Vec::<Point>::new());
        assert_eq!(decode_points("1,2;").unwrap(), vec![Point::new(1.0, 2.0)]);
        assert_eq!(
            decode_points("1,2;oops"),
            Err(RecordError::InvalidPoint("oops".to_string()))
        );
    }

    #[test]
    fn test_freehand_record_is_resmoothed() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let stroke = Shape::FreeHand(FreeHand::new(
            Uuid::new_v4(),
            ArgbColor::from_argb(128, 255, 255, 0),
            12.0,
            Tool::Highlighter,
            points.clone(),
        ));

        let record = ShapeRecord::from(&stroke);
        assert_eq!(record.kind, FREEHAND_KIND);
        assert_eq!(record.tool.as_deref(), Some("HIGHLIGHTER"));

        let decoded = Shape::try_from(record).unwrap();
        assert_eq!(decoded, stroke);
        let decoded = decoded.as_freehand().unwrap();
        assert_eq!(decoded.path(), &geometry::smoothed_path(&points));
    }

    #[test]
    fn test_geometric_record_json() {
        let id = Uuid::new_v4();
        let arrow = Shape::Geometric(Geometric::new(
            id,
            ArgbColor::BLACK,
            4.0,
            Tool::ArrowTwoSided,
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
        ));
        let json = serde_json::to_value(ShapeRecord::from(&arrow)).unwrap();

        assert_eq!(json["type"], "ARROW_TWO_SIDED");
        assert_eq!(json["color"], 0xFF00_0000u32);
        assert_eq!(json["strokeWidth"], 4.0);
        assert_eq!(json["endY"], 4.0);
        assert!(json.get("points").is_none());

        let record: ShapeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(Shape::try_from(record).unwrap(), arrow);
    }

    #[test]
    fn test_legacy_record_defaults() {
        let json = r#"{"id":"17","type":"FREEHAND","color":4278190080,"strokeWidth":10.0,"points":"1,1;2,2"}"#;
        let record: ShapeRecord = serde_json::from_str(json).unwrap();
        let shape = Shape::try_from(record).unwrap();

        assert!(!shape.id().is_nil());
        assert_eq!(shape.tool(), Tool::Pen);

        let json = r#"{"id":"18","type":"LINE_PLAIN","color":4278190080,"strokeWidth":1.0,"endX":5.0}"#;
        let record: ShapeRecord = serde_json::from_str(json).unwrap();
        let line = Shape::try_from(record).unwrap();
        let g = line.as_geometric().unwrap();
        assert_eq!((g.start, g.end), (Point::ZERO, Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let good = ShapeRecord::from(&Shape::Geometric(Geometric::new(
            Uuid::new_v4(),
            ArgbColor::BLACK,
            1.0,
            Tool::RectangleFilled,
            Point::ZERO,
            Point::new(1.0, 1.0),
        )));
        let mut unknown = good.clone();
        unknown.kind = "HEXAGON".to_string();
        let mut selector = good.clone();
        selector.kind = "SELECTOR".to_string();

        assert_eq!(
            Shape::try_from(unknown.clone()),
            Err(RecordError::UnknownKind("HEXAGON".to_string()))
        );
        let shapes = from_records(vec![unknown, good, selector]);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].tool(), Tool::RectangleFilled);
    }
}
