use rusqlite::Connection;
use school_reviews_core::db::open_db_in_memory;
use school_reviews_core::{
    RepoError, ReviewService, SqliteReviewRepository, SqliteSubjectRepository, SqliteVoteLedger,
    SubjectRepository, SubjectService, ValidationError, VoteLedger,
};

const SPACE: i64 = 100;
const OTHER_SPACE: i64 = 200;

type Subjects<'conn> = SubjectService<SqliteSubjectRepository<'conn>, SqliteReviewRepository<'conn>>;
type Reviews<'conn> = ReviewService<SqliteSubjectRepository<'conn>, SqliteReviewRepository<'conn>>;

fn subject_service(conn: &Connection) -> Subjects<'_> {
    SubjectService::new(
        SqliteSubjectRepository::new(conn),
        SqliteReviewRepository::new(conn),
    )
}

fn review_service(conn: &Connection) -> Reviews<'_> {
    ReviewService::new(
        SqliteSubjectRepository::new(conn),
        SqliteReviewRepository::new(conn),
    )
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn get_is_case_insensitive_and_preserves_casing() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);
    let created = subjects
        .upsert_subject(SPACE, "CS101", "Intro to Computing", "FIT")
        .unwrap();

    let loaded = subjects.get_subject(SPACE, "cs101").unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.shortcut, "CS101");
    assert!(subjects.get_subject(SPACE, "CS102").unwrap().is_none());
}

#[test]
fn subjects_are_scoped_per_space() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);
    subjects
        .upsert_subject(SPACE, "CS101", "Intro", "FIT")
        .unwrap();

    assert!(subjects.get_subject(OTHER_SPACE, "CS101").unwrap().is_none());
    let other = subjects
        .upsert_subject(OTHER_SPACE, "cs101", "Other intro", "FEKT")
        .unwrap();
    assert_eq!(other.space_id, OTHER_SPACE);
    assert_eq!(count_rows(&conn, "subjects"), 2);
}

#[test]
fn upsert_overwrites_existing_subject_in_place() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);
    let first = subjects
        .upsert_subject(SPACE, "CS101", "Intro", "FIT")
        .unwrap();
    let second = subjects
        .upsert_subject(SPACE, "cs101", "Introduction to Computing", "FIT VUT")
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Introduction to Computing");
    assert_eq!(second.category, "FIT VUT");
    assert_eq!(second.shortcut, "cs101");
    assert_eq!(count_rows(&conn, "subjects"), 1);
}

#[test]
fn create_rejects_duplicate_shortcut_regardless_of_case() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);
    subjects.create_subject(SPACE, "CS101", "Intro", "FIT").unwrap();

    let err = subjects
        .create_subject(SPACE, "Cs101", "Intro again", "FIT")
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateSubject { space_id: SPACE, ref shortcut } if shortcut == "Cs101"
    ));
    assert_eq!(count_rows(&conn, "subjects"), 1);
}

#[test]
fn blank_shortcut_is_rejected_on_write_and_absent_on_read() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);

    let err = subjects.upsert_subject(SPACE, "  ", "Nothing", "").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyShortcut)
    ));
    assert!(subjects.get_subject(SPACE, "  ").unwrap().is_none());
    assert!(!subjects.remove_subject(SPACE, "").unwrap());
}

#[test]
fn remove_reports_whether_a_row_was_deleted() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);
    subjects.upsert_subject(SPACE, "CS101", "Intro", "FIT").unwrap();

    assert!(subjects.remove_subject(SPACE, "CS101").unwrap());
    assert!(!subjects.remove_subject(SPACE, "CS101").unwrap());
    assert!(subjects.get_subject(SPACE, "cs101").unwrap().is_none());
}

#[test]
fn remove_cascades_to_reviews_and_votes() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);
    let reviews = review_service(&conn);
    let ledger = SqliteVoteLedger::new(&conn);
    subjects.upsert_subject(SPACE, "CS101", "Intro", "FIT").unwrap();
    subjects.upsert_subject(SPACE, "MA102", "Calculus", "FIT").unwrap();

    let doomed = reviews.add_review(SPACE, 1, "CS101", 4, false, "good").unwrap();
    let kept = reviews.add_review(SPACE, 1, "MA102", 2, false, "hard").unwrap();
    ledger.vote_up(doomed.id, 2).unwrap();
    ledger.vote_down(kept.id, 2).unwrap();

    assert!(subjects.remove_subject(SPACE, "cs101").unwrap());

    assert!(reviews.get_review(doomed.id).unwrap().is_none());
    assert!(reviews.get_review(kept.id).unwrap().is_some());
    assert_eq!(count_rows(&conn, "reviews"), 1);
    assert_eq!(count_rows(&conn, "review_votes"), 1);
    assert_eq!(ledger.negative_count(kept.id).unwrap(), 1);
}

#[test]
fn reviewed_listings_filter_by_space_and_author() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);
    let reviews = review_service(&conn);
    for shortcut in ["PH103", "CS101", "MA102"] {
        subjects.upsert_subject(SPACE, shortcut, "name", "cat").unwrap();
    }
    subjects.upsert_subject(OTHER_SPACE, "CS101", "name", "cat").unwrap();

    reviews.add_review(SPACE, 1, "PH103", 3, false, "ok").unwrap();
    reviews.add_review(SPACE, 2, "CS101", 5, true, "great").unwrap();
    reviews.add_review(OTHER_SPACE, 1, "CS101", 1, false, "bad").unwrap();

    let reviewed: Vec<String> = subjects
        .list_reviewed(SPACE)
        .unwrap()
        .into_iter()
        .map(|subject| subject.shortcut)
        .collect();
    assert_eq!(reviewed, ["CS101", "PH103"]);

    let by_author: Vec<String> = subjects
        .list_reviewed_by_user(SPACE, 1)
        .unwrap()
        .into_iter()
        .map(|subject| subject.shortcut)
        .collect();
    assert_eq!(by_author, ["PH103"]);

    assert_eq!(subjects.list_subjects(SPACE).unwrap().len(), 3);
    assert!(subjects.list_reviewed_by_user(SPACE, 3).unwrap().is_empty());
}

#[test]
fn subject_info_counts_reviews() {
    let conn = open_db_in_memory().unwrap();
    let subjects = subject_service(&conn);
    let reviews = review_service(&conn);
    subjects.upsert_subject(SPACE, "CS101", "Intro", "FIT").unwrap();
    reviews.add_review(SPACE, 1, "CS101", 4, false, "good").unwrap();
    reviews.add_review(SPACE, 2, "CS101", 2, true, "meh").unwrap();

    let info = subjects.subject_info(SPACE, "cs101").unwrap().unwrap();
    assert_eq!(info.subject.shortcut, "CS101");
    assert_eq!(info.review_count, 2);
    assert!(subjects.subject_info(SPACE, "XX000").unwrap().is_none());
}

#[test]
fn get_by_id_round_trips_through_repository() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSubjectRepository::new(&conn);
    let created = repo.upsert_subject(SPACE, "IZP", "Programming", "").unwrap();

    let loaded = repo.get_subject_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.label(), "IZP");
}
