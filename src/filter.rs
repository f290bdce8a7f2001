//! Listing filters: a whitelisted sort clause plus free-form parameters.

use std::collections::HashMap;

const DIRECTIONS: [&str; 2] = ["asc", "desc"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    /// Table alias prepended to every sort column, if non-empty.
    pub prefix: String,
    pub params: HashMap<String, String>,
    /// Ready-to-use `ORDER BY` body, e.g. `u.name asc,u.id desc`.
    pub sort: String,
}

impl Filter {
    /// Builds a filter from a `col:dir[,col:dir...]` sort query.
    ///
    /// Entries naming a column outside `allowed`, or a direction other than
    /// `asc`/`desc`, are dropped. If nothing survives, `default_sort` is used.
    pub fn new(prefix: &str, default_sort: &str, query: &str, allowed: &[&str]) -> Self {
        let sort = sort_clause(prefix, query, allowed);
        Self {
            prefix: prefix.to_owned(),
            params: HashMap::new(),
            sort: if sort.is_empty() { default_sort.to_owned() } else { sort },
        }
    }
}

fn sort_clause(prefix: &str, query: &str, allowed: &[&str]) -> String {
    query
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(':');
            let (col, dir) = (parts.next()?, parts.next()?);
            if parts.next().is_some() || !allowed.contains(&col) || !DIRECTIONS.contains(&dir) {
                return None;
            }
            Some(if prefix.is_empty() { format!("{col} {dir}") } else { format!("{prefix}.{col} {dir}") })
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const ALLOWED: &[&str] = &["name", "id"];

    #[rstest]
    #[case("", "name:asc", "name asc")]
    #[case("u", "name:asc,id:desc", "u.name asc,u.id desc")]
    #[case("", "name:up,id:desc", "id desc")]
    #[case("", "email:asc,id:asc", "id asc")]
    #[case("", "name:asc:extra,id", "id asc")]
    #[case("", "", "id asc")]
    #[case("", "email:desc", "id asc")]
    fn sort(#[case] prefix: &str, #[case] query: &str, #[case] expected: &str) {
        assert_eq!(Filter::new(prefix, "id asc", query, ALLOWED).sort, expected);
    }

    #[test]
    fn starts_without_params() {
        let f = Filter::new("t", "id asc", "", ALLOWED);
        assert_eq!(f.prefix, "t");
        assert!(f.params.is_empty());
    }
}
