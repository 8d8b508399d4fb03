//! Query-level PostgreSQL fragments.

/// Row lock suffix for `select ... for update`.
pub const LOCK_FOR_UPDATE: &str = "for update";

/// Row lock suffix for `select ... for share`.
pub const SHARED_LOCK: &str = "for share";

/// Order-by expression for random ordering.
pub const RANDOM_ORDER: &str = "RANDOM()";

/// Statement reclaiming storage.
pub const PRUNE: &str = "vacuum full";

/// PostgreSQL query fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query;

#[allow(clippy::unused_self)]
impl Query {
    /// Creates a query fragment compiler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the exclusive row lock suffix.
    #[must_use]
    pub const fn lock_for_update(&self) -> &'static str {
        LOCK_FOR_UPDATE
    }

    /// Returns the shared row lock suffix.
    #[must_use]
    pub const fn shared_lock(&self) -> &'static str {
        SHARED_LOCK
    }

    /// Returns the random ordering expression.
    #[must_use]
    pub const fn random_order(&self) -> &'static str {
        RANDOM_ORDER
    }

    /// Returns the prune statement. The database name is not needed.
    #[must_use]
    pub const fn compile_prune(&self, _database: &str) -> &'static str {
        PRUNE
    }

    /// Appends a lock suffix to `sql` when `enabled`.
    #[must_use]
    pub fn with_lock(&self, sql: &str, lock: &str, enabled: bool) -> String {
        if enabled {
            format!("{sql} {lock}")
        } else {
            sql.to_string()
        }
    }

    /// Rewrites `?` placeholders to `$1..$n`.
    ///
    /// `??` stands for a literal `?`, which keeps the jsonb key-exists
    /// operator usable. Question marks inside single-quoted literals or
    /// double-quoted identifiers are left alone.
    #[must_use]
    pub fn to_dollar_placeholders(&self, sql: &str) -> String {
        let mut rewritten = String::with_capacity(sql.len() + 8);
        let mut position = 0usize;
        let mut quote: Option<char> = None;
        let mut chars = sql.chars().peekable();

        while let Some(c) = chars.next() {
            match (quote, c) {
                (Some(open), c) if c == open => {
                    quote = None;
                    rewritten.push(c);
                }
                (Some(_), c) => rewritten.push(c),
                (None, '\'' | '"') => {
                    quote = Some(c);
                    rewritten.push(c);
                }
                (None, '?') if chars.peek() == Some(&'?') => {
                    chars.next();
                    rewritten.push('?');
                }
                (None, '?') => {
                    position += 1;
                    rewritten.push('$');
                    rewritten.push_str(&position.to_string());
                }
                (None, c) => rewritten.push(c),
            }
        }

        rewritten
    }
}
