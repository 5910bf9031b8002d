use crate::model::review::Review;

/// Arithmetic mean of `tier`, or `None` for an empty slice.
pub fn average_tier(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|review| u32::from(review.tier)).sum();
    Some(f64::from(sum) / reviews.len() as f64)
}

/// Newest first. Stable: reviews with the same date keep their input order.
pub fn sorted_by_date_desc(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.sort_by(|a, b| b.date.cmp(&a.date));
    reviews
}
