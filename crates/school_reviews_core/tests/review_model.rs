use chrono::NaiveDate;
use school_reviews_core::{Review, Subject, VoteState, VoteTally};
use uuid::Uuid;

#[test]
fn review_serialization_uses_expected_fields() {
    let review = Review {
        id: Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap(),
        author_id: 301,
        subject_id: Uuid::parse_str("66666666-7777-4888-9999-000000000000").unwrap(),
        anonymous: true,
        tier: 2,
        text: "lots of homework".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 2, 13).unwrap(),
    };

    let json = serde_json::to_value(&review).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["author_id"], 301);
    assert_eq!(json["anonymous"], true);
    assert_eq!(json["tier"], 2);
    assert_eq!(json["date"], "2024-02-13");

    let decoded: Review = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, review);
    assert!(decoded.validate().is_ok());
}

#[test]
fn subject_serializes_with_shortcut_casing() {
    let subject = Subject {
        id: Uuid::nil(),
        space_id: 1,
        shortcut: "IZP".to_string(),
        name: "Procedural Programming".to_string(),
        category: "FIT".to_string(),
    };
    let json = serde_json::to_value(&subject).unwrap();
    assert_eq!(json["shortcut"], "IZP");
    assert_eq!(json["category"], "FIT");
}

#[test]
fn vote_types_serialize_as_snake_case_and_counts() {
    assert_eq!(serde_json::to_value(VoteState::Up).unwrap(), "up");
    assert_eq!(serde_json::to_value(VoteState::Neutral).unwrap(), "neutral");

    let tally = VoteTally {
        positive: 3,
        negative: 1,
    };
    let json = serde_json::to_value(tally).unwrap();
    assert_eq!(json["positive"], 3);
    assert_eq!(json["negative"], 1);
}
