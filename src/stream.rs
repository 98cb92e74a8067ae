//! Replaying frames through fixed-size buffers

use dashframe_core::{CircularDataFrame, CircularOptions, DataFrameDto, FieldDto, Record};
use log::debug;
use serde_json::Value;

/// Feed a frame's rows one record at a time into a circular frame, the way
/// a live stream would arrive. Only the newest `capacity` rows survive.
pub fn replay_into_circular(dto: DataFrameDto, options: CircularOptions) -> CircularDataFrame {
    let mut frame = CircularDataFrame::new(options);
    frame.name = dto.name;
    frame.ref_id = dto.ref_id;
    frame.labels = dto.labels;
    frame.meta = dto.meta;

    let mut columns = Vec::with_capacity(dto.fields.len());
    for (index, field) in dto.fields.into_iter().enumerate() {
        let name = field
            .name
            .clone()
            .unwrap_or_else(|| format!("Field {}", index + 1));
        columns.push((name.clone(), field.values.unwrap_or_default()));
        frame.add_field(FieldDto {
            name: Some(name),
            values: None,
            ..field
        });
    }

    let rows = columns.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
    for row in 0..rows {
        let record: Record = columns
            .iter()
            .map(|(name, values)| (name.clone(), values.get(row).cloned().unwrap_or(Value::Null)))
            .collect();
        frame.add(&record, false);
    }

    debug!(
        "Replayed {} rows into circular frame {:?} (capacity {})",
        rows,
        frame.name,
        options.capacity
    );
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashframe_core::{AppendMode, Frame, Vector};
    use serde_json::json;

    fn dto() -> DataFrameDto {
        serde_json::from_value(json!({
            "name": "cpu",
            "refId": "A",
            "fields": [
                {"name": "time", "type": "time", "values": [1, 2, 3, 4]},
                {"name": "value", "type": "number", "values": [10, 20, 30, 40]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_tail_keeps_newest_rows() {
        let frame = replay_into_circular(dto(), CircularOptions::new(2, AppendMode::Tail));
        assert_eq!(frame.length(), 2);
        assert_eq!(frame.name(), Some("cpu"));
        assert_eq!(frame.ref_id(), Some("A"));
        let values = frame.values("value").unwrap().to_vec();
        assert_eq!(values, vec![json!(30), json!(40)]);
    }

    #[test]
    fn test_head_puts_newest_first() {
        let frame = replay_into_circular(dto(), CircularOptions::new(3, AppendMode::Head));
        let times = frame.values("time").unwrap().to_vec();
        assert_eq!(times, vec![json!(4), json!(3), json!(2)]);
    }

    #[test]
    fn test_short_columns_pad_with_null() {
        let dto: DataFrameDto = serde_json::from_value(json!({
            "fields": [
                {"name": "a", "values": [1, 2]},
                {"name": "b", "values": [5]}
            ]
        }))
        .unwrap();
        let frame = replay_into_circular(dto, CircularOptions::default());
        assert_eq!(frame.values("b").unwrap().to_vec(), vec![json!(5), Value::Null]);
    }
}
