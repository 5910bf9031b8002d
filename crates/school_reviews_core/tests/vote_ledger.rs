use rusqlite::Connection;
use school_reviews_core::db::open_db_in_memory;
use school_reviews_core::{
    RepoError, Review, ReviewService, ReviewVotes, SqliteReviewRepository,
    SqliteSubjectRepository, SqliteVoteLedger, SubjectRepository, Votable, VoteLedger, VoteState,
    VoteTally,
};
use uuid::Uuid;

const SPACE: i64 = 9;
const AUTHOR: i64 = 1;

fn seeded_review(conn: &Connection) -> Review {
    SqliteSubjectRepository::new(conn)
        .upsert_subject(SPACE, "CS101", "Intro", "FIT")
        .unwrap();
    ReviewService::new(
        SqliteSubjectRepository::new(conn),
        SqliteReviewRepository::new(conn),
    )
    .add_review(SPACE, AUTHOR, "CS101", 4, false, "good")
    .unwrap()
}

fn counts(ledger: &SqliteVoteLedger<'_>, review: &Review) -> (u32, u32) {
    (
        ledger.positive_count(review.id).unwrap(),
        ledger.negative_count(review.id).unwrap(),
    )
}

#[test]
fn up_down_neutral_transitions() {
    let conn = open_db_in_memory().unwrap();
    let review = seeded_review(&conn);
    let ledger = SqliteVoteLedger::new(&conn);

    ledger.vote_up(review.id, 2).unwrap();
    assert_eq!(counts(&ledger, &review), (1, 0));
    assert_eq!(ledger.vote_of(review.id, 2).unwrap(), VoteState::Up);

    ledger.vote_down(review.id, 2).unwrap();
    assert_eq!(counts(&ledger, &review), (0, 1));
    assert_eq!(ledger.vote_of(review.id, 2).unwrap(), VoteState::Down);

    ledger.vote_neutral(review.id, 2).unwrap();
    assert_eq!(counts(&ledger, &review), (0, 0));
    assert_eq!(ledger.vote_of(review.id, 2).unwrap(), VoteState::Neutral);
}

#[test]
fn repeated_votes_are_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let review = seeded_review(&conn);
    let ledger = SqliteVoteLedger::new(&conn);

    for _ in 0..3 {
        ledger.vote_up(review.id, 2).unwrap();
    }
    assert_eq!(counts(&ledger, &review), (1, 0));

    for _ in 0..3 {
        ledger.vote_neutral(review.id, 3).unwrap();
    }
    assert_eq!(counts(&ledger, &review), (1, 0));

    for _ in 0..2 {
        ledger.vote_down(review.id, 2).unwrap();
    }
    assert_eq!(counts(&ledger, &review), (0, 1));
}

#[test]
fn tally_matches_distinct_non_neutral_voters() {
    let conn = open_db_in_memory().unwrap();
    let review = seeded_review(&conn);
    let ledger = SqliteVoteLedger::new(&conn);

    for voter in 10..16 {
        if voter % 2 == 0 {
            ledger.vote_up(review.id, voter).unwrap();
        } else {
            ledger.vote_down(review.id, voter).unwrap();
        }
    }
    ledger.vote_neutral(review.id, 15).unwrap();
    ledger.vote_up(review.id, 11).unwrap();

    let tally = ledger.tally(review.id).unwrap().unwrap();
    assert_eq!(
        tally,
        VoteTally {
            positive: 4,
            negative: 1
        }
    );
    let voters: i64 = conn
        .query_row(
            "SELECT COUNT(DISTINCT voter_id) FROM review_votes WHERE review_uuid = ?1;",
            [review.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(i64::from(tally.total()), voters);
}

#[test]
fn voting_on_missing_review_fails_and_counts_are_zero() {
    let conn = open_db_in_memory().unwrap();
    let ledger = SqliteVoteLedger::new(&conn);
    let missing = Uuid::new_v4();

    let err = ledger.vote_up(missing, 2).unwrap_err();
    assert!(matches!(err, RepoError::ReviewNotFound(id) if id == missing));
    assert_eq!(ledger.tally(missing).unwrap(), None);
    assert_eq!(ledger.positive_count(missing).unwrap(), 0);
    assert_eq!(ledger.negative_count(missing).unwrap(), 0);
}

#[test]
fn votes_are_scoped_per_review() {
    let conn = open_db_in_memory().unwrap();
    let first = seeded_review(&conn);
    let second = ReviewService::new(
        SqliteSubjectRepository::new(&conn),
        SqliteReviewRepository::new(&conn),
    )
    .add_review(SPACE, AUTHOR + 1, "CS101", 2, true, "meh")
    .unwrap();
    let ledger = SqliteVoteLedger::new(&conn);

    ledger.vote_up(first.id, 5).unwrap();
    ledger.vote_down(second.id, 5).unwrap();

    assert_eq!(counts(&ledger, &first), (1, 0));
    assert_eq!(counts(&ledger, &second), (0, 1));
}

#[test]
fn votable_projection_returns_refreshed_tally() {
    let conn = open_db_in_memory().unwrap();
    let review = seeded_review(&conn);
    let ledger = SqliteVoteLedger::new(&conn);
    let votes = ReviewVotes::new(review.id, &ledger);

    assert_eq!(votes.review_id(), review.id);
    assert_eq!(votes.tally().unwrap(), Some(VoteTally::default()));
    assert_eq!(
        votes.vote_up(2).unwrap(),
        Some(VoteTally {
            positive: 1,
            negative: 0
        })
    );
    assert_eq!(
        votes.vote_down(2).unwrap(),
        Some(VoteTally {
            positive: 0,
            negative: 1
        })
    );
    assert_eq!(votes.vote_neutral(2).unwrap(), Some(VoteTally::default()));
}

#[test]
fn votable_projection_tolerates_removed_review() {
    let conn = open_db_in_memory().unwrap();
    let review = seeded_review(&conn);
    let ledger = SqliteVoteLedger::new(&conn);
    let votes = ReviewVotes::new(review.id, &ledger);

    let reviews = ReviewService::new(
        SqliteSubjectRepository::new(&conn),
        SqliteReviewRepository::new(&conn),
    );
    assert!(reviews.remove_review(SPACE, AUTHOR, "CS101").unwrap());

    assert_eq!(votes.vote_up(2).unwrap(), None);
    assert_eq!(votes.vote_neutral(2).unwrap(), None);
    assert_eq!(votes.tally().unwrap(), None);
}
