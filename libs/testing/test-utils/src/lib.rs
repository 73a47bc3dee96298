//! Shared test utilities
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic user field values (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let email = builder.email("owner");
//!     let username = builder.username("owner");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic values
///
/// Values derived from the same seed are identical between runs, values from
/// different seeds don't collide, which keeps unique-email tests independent.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// assert!(builder.email("a").ends_with("@example.com"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique email for `label` within this test, e.g. `owner.1234@example.com`
    pub fn email(&self, label: &str) -> String {
        format!("{}.{}@example.com", label, self.seed)
    }

    /// Username for `label`, always within 2..=50 characters
    pub fn username(&self, label: &str) -> String {
        let name = format!("{} {}", label, self.seed % 100_000);
        name.chars().take(50).collect()
    }

    /// E.164 phone number, `n` distinguishes numbers within a test
    pub fn phone_number(&self, n: u32) -> String {
        format!("+1{:03}{:07}", 200 + (self.seed % 700), n % 10_000_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.email("a"), builder2.email("a"));
        assert_eq!(builder1.username("a"), builder2.username("a"));
        assert_eq!(builder1.phone_number(1), builder2.phone_number(1));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.email("a"), builder2.email("a"));
    }

    #[test]
    fn test_data_builder_phone_number_is_e164() {
        let builder = TestDataBuilder::from_test_name("phone");
        let phone = builder.phone_number(42);

        assert!(phone.starts_with("+1"));
        assert_eq!(phone.len(), 12);
        assert!(phone[1..].chars().all(|c| c.is_ascii_digit()));
        assert_ne!(&phone[1..2], "0");
    }

    #[test]
    fn test_data_builder_username_length() {
        let builder = TestDataBuilder::new(u64::MAX);
        let name = builder.username("a-very-long-label-that-goes-on-and-on-for-a-while");
        assert!(name.chars().count() >= 2 && name.chars().count() <= 50);
    }
}
