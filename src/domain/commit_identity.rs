/// Length of the abbreviated hash used in build messages.
pub const SHORT_HASH_LEN: usize = 7;

/// Hash and subject line of the commit that downstream builds should pin to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    hash: String,
    subject: String,
}

impl CommitIdentity {
    /// Creates a new `CommitIdentity` instance.
    ///
    /// # Arguments
    ///
    /// * `hash` - The full commit hash. Must be at least seven hex digits.
    /// * `subject` - The first line of the commit message.
    ///
    /// # Returns
    ///
    /// Returns `Ok(CommitIdentity)` with both values trimmed, or `Err(String)`
    /// if the hash is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use trigger_dependants::domain::CommitIdentity;
    ///
    /// let identity = CommitIdentity::new("abc1234567", "Fix bug").unwrap();
    /// assert_eq!(identity.short_hash(), "abc1234");
    /// ```
    pub fn new(hash: impl Into<String>, subject: impl Into<String>) -> Result<Self, String> {
        let hash = hash.into().trim().to_lowercase();
        if hash.len() < SHORT_HASH_LEN {
            return Err(format!(
                "{hash} is shorter than {SHORT_HASH_LEN} characters, not a commit hash."
            ));
        }
        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("{hash} is not a hexadecimal commit hash."));
        }

        Ok(Self {
            hash,
            subject: subject.into().trim().to_string(),
        })
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn short_hash(&self) -> &str {
        // ASCII-only after validation, so byte slicing is safe.
        &self.hash[..SHORT_HASH_LEN]
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}
