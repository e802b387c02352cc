//! Generated records for the demo table.

use std::fs;
use std::path::Path;

use rand::Rng;
use tracing::{debug, info};

use datagrid::{Alignment, ColumnRowModel, ColumnSpec, DataGridError, RowModel, ValueKind};

pub const BUNDLED_WORDS: &str = include_str!("../assets/words.txt");

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub city: String,
    pub age: i64,
    pub score: f64,
    pub active: bool,
}

/// Words of a word list, skipping blank lines and `#` comments.
pub fn parse_words(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Load the word list at `path`, or the bundled one.
pub fn load_words(path: Option<&Path>) -> Result<Vec<String>, DataGridError> {
    let (name, words) = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| DataGridError::ResourceLoad {
                path: path.to_path_buf(),
                source,
            })?;
            (path.display().to_string(), parse_words(&content))
        }
        None => ("bundled word list".to_string(), parse_words(BUNDLED_WORDS)),
    };
    if words.is_empty() {
        return Err(DataGridError::EmptyResource(name));
    }
    info!("Loaded {} words from {name}", words.len());
    Ok(words)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pick<'a>(words: &'a [String], rng: &mut impl Rng) -> &'a str {
    &words[rng.random_range(0..words.len())]
}

pub fn generate_people(words: &[String], count: usize, rng: &mut impl Rng) -> Vec<Person> {
    if words.is_empty() {
        return Vec::new();
    }
    let people: Vec<Person> = (0..count)
        .map(|_| {
            let first = capitalize(pick(words, rng));
            let last = capitalize(pick(words, rng));
            Person {
                name: format!("{first} {last}"),
                city: capitalize(pick(words, rng)),
                age: rng.random_range(18..90),
                score: rng.random_range(0.0..100.0),
                active: rng.random_bool(0.7),
            }
        })
        .collect();
    debug!("Generated {} people", people.len());
    people
}

pub fn person_row_model() -> ColumnRowModel<Person> {
    ColumnRowModel::new(vec![
        ColumnSpec::text("Name", |p: &Person| p.name.clone()),
        ColumnSpec::text("City", |p: &Person| p.city.clone()),
        ColumnSpec::new("Age", ValueKind::Integer, |p: &Person| p.age),
        ColumnSpec::new("Score", ValueKind::Float, |p: &Person| p.score),
        ColumnSpec::new("Active", ValueKind::Boolean, |p: &Person| p.active)
            .align(Alignment::Center),
    ])
}

fn wrap_cell_content(c: &str) -> String {
    let needs_escaping = c.contains('"');
    let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
    let mut out = String::from(c);

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping {
        out = format!("\"{out}\"");
    }
    out
}

/// Render `records` as CSV lines, one per record, in column order.
pub fn records_as_csv<T>(row_model: &dyn RowModel<T>, records: &[T]) -> String {
    records
        .iter()
        .map(|record| {
            (0..row_model.column_count())
                .map(|column| wrap_cell_content(&row_model.value(record, column).to_string()))
                .collect::<Vec<String>>()
                .join(",")
        })
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn bundled_words_skip_comments() {
        let words = parse_words(BUNDLED_WORDS);
        assert!(words.len() > 50);
        assert!(words.iter().all(|w| !w.starts_with('#') && !w.is_empty()));
    }

    #[test]
    fn missing_word_list_is_a_resource_error() {
        let err = load_words(Some(Path::new("/definitely/not/here.txt"))).unwrap_err();
        assert!(matches!(err, DataGridError::ResourceLoad { .. }));
    }

    #[test]
    fn empty_word_list_is_rejected() {
        let path = std::env::temp_dir().join("datagrid-empty-words.txt");
        fs::write(&path, "# nothing here\n\n").unwrap();
        let err = load_words(Some(&path)).unwrap_err();
        assert!(matches!(err, DataGridError::EmptyResource(_)));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn generated_people_are_in_range() {
        let words = parse_words("alpha\nbeta\n");
        let mut rng = StdRng::seed_from_u64(7);
        let people = generate_people(&words, 20, &mut rng);
        assert_eq!(people.len(), 20);
        for person in &people {
            assert!((18..90).contains(&person.age));
            assert!((0.0..100.0).contains(&person.score));
            assert!(["Alpha", "Beta"].contains(&person.city.as_str()));
        }
    }

    #[test]
    fn csv_wraps_and_escapes() {
        let people = vec![Person {
            name: "Ada \"Countess\" Lovelace".to_string(),
            city: "London".to_string(),
            age: 36,
            score: 99.5,
            active: true,
        }];
        let csv = records_as_csv(&person_row_model(), &people);
        assert_eq!(csv, "\"Ada \"\"Countess\"\" Lovelace\",London,36,99.50,yes");
    }
}
