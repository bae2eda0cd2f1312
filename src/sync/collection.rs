/// One remote collection as the dashboard last saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection<T> {
    /// No load has completed yet
    Pending,
    /// A load completed and the table had no rows
    Empty,
    Rows(Vec<T>),
}

/// Where the rows a screen shows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    SeedWhileLoading,
    SeedForEmpty,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Remote => "live",
            DataSource::SeedWhileLoading => "demo: loading",
            DataSource::SeedForEmpty => "demo: empty",
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection::Pending
    }
}

impl<T> Collection<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Collection::Empty
        } else {
            Collection::Rows(rows)
        }
    }

    /// The remote rows, or `seed` when there are none to show.
    ///
    /// `Pending` and `Empty` both fall back; the two stay distinguishable
    /// through [`Collection::source`].
    pub fn rows_or<'a>(&'a self, seed: &'a [T]) -> &'a [T] {
        match self {
            Collection::Rows(rows) => rows,
            Collection::Pending | Collection::Empty => seed,
        }
    }

    /// Remote rows only; empty while pending.
    pub fn remote(&self) -> &[T] {
        match self {
            Collection::Rows(rows) => rows,
            Collection::Pending | Collection::Empty => &[],
        }
    }

    pub fn source(&self) -> DataSource {
        match self {
            Collection::Pending => DataSource::SeedWhileLoading,
            Collection::Empty => DataSource::SeedForEmpty,
            Collection::Rows(_) => DataSource::Remote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_pending_fall_back_but_stay_distinct() {
        let seed = [1, 2, 3];

        let pending: Collection<i32> = Collection::default();
        let empty = Collection::from_rows(Vec::new());
        let loaded = Collection::from_rows(vec![9]);

        assert_eq!(pending.rows_or(&seed), &seed);
        assert_eq!(empty.rows_or(&seed), &seed);
        assert_eq!(loaded.rows_or(&seed), &[9]);

        assert_eq!(pending.source(), DataSource::SeedWhileLoading);
        assert_eq!(empty.source(), DataSource::SeedForEmpty);
        assert_eq!(loaded.source(), DataSource::Remote);
        assert!(empty.remote().is_empty());
    }
}
