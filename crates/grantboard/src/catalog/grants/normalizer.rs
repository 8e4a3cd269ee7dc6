use serde_json::Value;

use super::domain::{Grant, GrantStatus};
use crate::catalog::normalize::{
    date, identified, optional_text, text, text_list, NormalizationError, Record,
};

/// Builds a [`Grant`] from one raw record of the grant collection.
///
/// Only a missing or blank `_id` is fatal. Absent or mistyped fields fall back
/// to empty values, an unparseable `deadline` becomes `None`, and unknown
/// fields are ignored.
pub fn normalize_grant(raw: &Value) -> Result<Grant, NormalizationError> {
    let (record, id) = identified(raw)?;

    Ok(Grant {
        id,
        title: text(record, "title"),
        description: text(record, "description"),
        grant_type: text(record, "type"),
        funding_label: text(record, "funding"),
        industry: text(record, "industry"),
        activity: text(record, "activity"),
        location: text(record, "location"),
        image_url: optional_text(record, "imageUrl"),
        deadline: date(record, "deadline"),
        status: GrantStatus::parse(&text(record, "status")),
        file_urls: file_urls(record),
    })
}

/// `fileUrls` wins whenever it holds at least one URL; `fileUrl` is only a fallback.
fn file_urls(record: &Record) -> Vec<String> {
    let many = text_list(record, "fileUrls");
    if !many.is_empty() {
        return many;
    }

    optional_text(record, "fileUrl").into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn full_record() -> Value {
        json!({
            "_id": "66f1c0de",
            "title": "Green Energy Innovation Fund",
            "type": "Competitive",
            "funding": "Up to $50,000",
            "deadline": "2025-03-10T00:00:00.000Z",
            "location": "Texas, USA",
            "activity": "Research",
            "industry": "Energy",
            "description": "Supports clean-tech pilots.",
            "imageUrl": "https://cdn.example.com/grant.png",
            "fileUrl": "https://cdn.example.com/single.pdf",
            "status": "upcoming",
            "createdAt": "2025-01-01T00:00:00.000Z",
            "__v": 0
        })
    }

    #[test]
    fn normalizes_every_known_field() {
        let grant = normalize_grant(&full_record()).expect("grant normalizes");

        assert_eq!(grant.id, "66f1c0de");
        assert_eq!(grant.title, "Green Energy Innovation Fund");
        assert_eq!(grant.grant_type, "Competitive");
        assert_eq!(grant.funding_label, "Up to $50,000");
        assert_eq!(grant.industry, "Energy");
        assert_eq!(grant.activity, "Research");
        assert_eq!(grant.location, "Texas, USA");
        assert_eq!(
            grant.image_url.as_deref(),
            Some("https://cdn.example.com/grant.png")
        );
        assert_eq!(grant.deadline, NaiveDate::from_ymd_opt(2025, 3, 10));
        assert_eq!(grant.status, GrantStatus::Upcoming);
        assert_eq!(grant.file_urls, vec!["https://cdn.example.com/single.pdf"]);
    }

    #[test]
    fn multi_url_field_takes_precedence() {
        let mut raw = full_record();
        raw["fileUrls"] = json!(["https://a.example/1.pdf", "https://a.example/2.pdf"]);

        let grant = normalize_grant(&raw).expect("grant normalizes");
        assert_eq!(
            grant.file_urls,
            vec!["https://a.example/1.pdf", "https://a.example/2.pdf"]
        );
    }

    #[test]
    fn empty_multi_url_field_falls_back_to_single_url() {
        let mut raw = full_record();
        raw["fileUrls"] = json!([]);

        let grant = normalize_grant(&raw).expect("grant normalizes");
        assert_eq!(grant.file_urls, vec!["https://cdn.example.com/single.pdf"]);
    }

    #[test]
    fn missing_url_fields_yield_no_files() {
        let raw = json!({ "_id": "g-1", "fileUrl": "", "fileUrls": "not-a-list" });
        let grant = normalize_grant(&raw).expect("grant normalizes");
        assert!(grant.file_urls.is_empty());
    }

    #[test]
    fn sparse_record_gets_defaults() {
        let grant = normalize_grant(&json!({ "_id": "g-2", "deadline": "soon" }))
            .expect("grant normalizes");

        assert_eq!(grant.title, "");
        assert_eq!(grant.location, "");
        assert!(grant.image_url.is_none());
        assert!(grant.deadline.is_none());
        assert_eq!(grant.status, GrantStatus::Open);
    }

    #[test]
    fn rejects_records_without_identity() {
        let mut raw = full_record();
        raw["_id"] = json!("");
        assert_eq!(
            normalize_grant(&raw).unwrap_err(),
            NormalizationError::MissingId
        );

        let raw = json!({ "title": "Orphan" });
        assert_eq!(
            normalize_grant(&raw).unwrap_err(),
            NormalizationError::MissingId
        );
    }

    #[test]
    fn normalization_is_repeatable() {
        let raw = full_record();
        assert_eq!(
            normalize_grant(&raw).expect("first pass"),
            normalize_grant(&raw).expect("second pass")
        );
    }
}
