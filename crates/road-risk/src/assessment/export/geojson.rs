use serde_json::{json, Value};

use super::super::domain::AssessmentRecord;
use super::rows::ExportRow;

/// Point features for every record with a site location. Records without one are skipped.
pub fn feature_collection(records: &[AssessmentRecord]) -> Result<Value, serde_json::Error> {
    let mut features = Vec::new();

    for record in records {
        let Some(point) = record.basic_info.location else {
            continue;
        };

        let mut properties = serde_json::to_value(ExportRow::from(record))?;
        if let Value::Object(map) = &mut properties {
            map.remove("latitude");
            map.remove("longitude");
            map.insert(
                "final_color".to_string(),
                Value::String(record.outcome.override_state().final_color.clone()),
            );
        }

        features.push(json!({
            "type": "Feature",
            "id": record.id.0,
            "geometry": {
                "type": "Point",
                "coordinates": [point.longitude, point.latitude],
            },
            "properties": properties,
        }));
    }

    Ok(json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}
