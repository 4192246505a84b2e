/// An ascii table.
///
/// Cells are centered in their column.
#[derive(Debug)]
pub struct AsciiTable {
    rows: Vec<Vec<String>>,

    column_widths: Vec<usize>,
}

impl AsciiTable {
    /// Make a new table with a header row
    pub fn new<I>(header: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut table = Self {
            rows: Vec::new(),
            column_widths: Vec::new(),
        };
        table.push_row(header);
        table
    }

    /// Add a row.
    ///
    /// Rows shorter than the widest row are padded with empty cells.
    pub fn push_row<I>(&mut self, row: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();

        if row.len() > self.column_widths.len() {
            self.column_widths.resize(row.len(), 0);
        }

        for (cell, column_width) in row.iter().zip(self.column_widths.iter_mut()) {
            *column_width = std::cmp::max(*column_width, cell.chars().count());
        }

        self.rows.push(row);
    }

    fn fmt_row_border(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+")?;
        for column_width in self.column_widths.iter() {
            write!(f, "{}+", "-".repeat(*column_width + 2))?;
        }
        writeln!(f)
    }
}

impl std::fmt::Display for AsciiTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            // Rule above the header and below it.
            if i <= 1 {
                self.fmt_row_border(f)?;
            }

            write!(f, "|")?;
            for (column, column_width) in self.column_widths.iter().enumerate() {
                let cell = row.get(column).map(String::as_str).unwrap_or("");
                let padding = column_width.saturating_sub(cell.chars().count());
                let left = padding / 2;
                let right = padding - left;

                write!(f, " {}{}{} |", " ".repeat(left), cell, " ".repeat(right))?;
            }
            writeln!(f)?;
        }
        self.fmt_row_border(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn centered_cells() {
        let mut table = AsciiTable::new(["map", "win %"]);
        table.push_row(["BANK", "60.0"]);
        table.push_row(["VILLA", "100.0"]);

        let expected = "\
+-------+-------+
|  map  | win % |
+-------+-------+
| BANK  | 60.0  |
| VILLA | 100.0 |
+-------+-------+
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn ragged_rows() {
        let mut table = AsciiTable::new(["a"]);
        table.push_row(["b", "cc"]);

        let expected = "\
+---+----+
| a |    |
+---+----+
| b | cc |
+---+----+
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn wide_chars_count_once() {
        let table = AsciiTable::new(["Élan"]);
        assert_eq!(table.to_string().lines().next(), Some("+------+"));
    }
}
