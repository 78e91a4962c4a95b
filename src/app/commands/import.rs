//! `import`: run a blob through the ingestion pipeline.

use serde_json::Value;

use super::{IngestReport, schema_ops};
use crate::domain::{AppError, PipelineKind};

pub fn execute(pipeline: PipelineKind, raw: &Value) -> Result<IngestReport, AppError> {
    schema_ops(pipeline)?.ingest(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IngestRoute;
    use serde_json::json;

    #[test]
    fn legacy_website_is_migrated() {
        let report = execute(PipelineKind::Website, &json!({"businessName": "Bakery"})).unwrap();
        assert_eq!(report.route, IngestRoute::Migrated);
        assert_eq!(report.config["meta"]["businessName"], "Bakery");
        assert!(report.config.get("businessName").is_none());
    }
}
