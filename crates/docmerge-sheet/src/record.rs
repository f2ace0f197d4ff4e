use crate::value::{format_value, CellValue};

/// One row's values, aligned to the resolved columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    row: u32,
    values: Vec<CellValue>,
}

impl Record {
    /// `row` is the 1-based spreadsheet row the values came from.
    pub fn new(row: u32, values: Vec<CellValue>) -> Self {
        Self { row, values }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// True when every field is empty; such rows produce no document.
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(CellValue::is_empty)
    }

    /// Field values rendered as substitution text, in field order.
    pub fn texts(&self) -> Vec<String> {
        self.values.iter().map(format_value).collect()
    }

    /// Rendered first field; names the output document.
    pub fn key(&self) -> String {
        self.values.first().map(format_value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_only_when_every_field_is_empty() {
        let blank = Record::new(2, vec![CellValue::Empty, CellValue::String(" ".into())]);
        assert!(blank.is_blank());
        let partial = Record::new(3, vec![CellValue::Empty, CellValue::Float(3.0)]);
        assert!(!partial.is_blank());
        assert!(Record::new(4, Vec::new()).is_blank());
    }

    #[test]
    fn texts_and_key_use_merge_formatting() {
        let rec = Record::new(
            2,
            vec![
                CellValue::String("Acme".into()),
                CellValue::Float(2024.0),
                CellValue::Empty,
            ],
        );
        assert_eq!(rec.texts(), vec!["Acme", "2024", ""]);
        assert_eq!(rec.key(), "Acme");
        assert_eq!(Record::new(5, Vec::new()).key(), "");
    }
}
