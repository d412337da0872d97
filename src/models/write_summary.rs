use mongodb::bson::Bson;
use mongodb::results::UpdateResult;
use serde::Serialize;

/// Outcome of a single-document update, reported back on todo creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WriteSummary {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl WriteSummary {
    pub fn matched(count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count: count,
            modified_count: count,
            ..Default::default()
        }
    }

    pub fn upserted(id: String) -> Self {
        Self {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: Some(id),
            ..Default::default()
        }
    }

    pub fn is_miss(&self) -> bool {
        self.matched_count == 0 && self.upserted_count == 0
    }
}

impl From<UpdateResult> for WriteSummary {
    fn from(result: UpdateResult) -> Self {
        let upserted_id = result.upserted_id.map(|id| match id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        });

        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_detection() {
        assert!(WriteSummary::matched(0).is_miss());
        assert!(!WriteSummary::matched(1).is_miss());
        assert!(!WriteSummary::upserted("abc".to_string()).is_miss());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(WriteSummary::upserted("65f0".to_string())).unwrap();
        assert_eq!(value["upsertedCount"], 1);
        assert_eq!(value["upsertedId"], "65f0");
        assert_eq!(value["matchedCount"], 0);
    }
}
