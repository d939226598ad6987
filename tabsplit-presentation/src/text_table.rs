use std::{borrow::Cow, fmt::Write};

const COLUMN_GAP: &str = "  ";
const RULE_CHAR: char = '-';

#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.as_ref().iter().enumerate().take(col_count) {
                col_widths[i] = col_widths[i].max(text_width(cell));
            }
        }

        let mut table = String::with_capacity(256);
        self.write_line(&mut table, self.headers, &col_widths);

        let rule: Vec<Cow<'_, str>> = col_widths
            .iter()
            .map(|&width| Cow::Owned(RULE_CHAR.to_string().repeat(width)))
            .collect();
        self.write_line(&mut table, &rule, &col_widths);

        for row in &self.rows {
            self.write_line(&mut table, row.as_ref(), &col_widths);
        }

        table
    }

    fn write_line(&self, out: &mut String, cells: &[Cow<'_, str>], col_widths: &[usize]) {
        let mut line = String::new();
        for (i, &width) in col_widths.iter().enumerate() {
            if i > 0 {
                line.push_str(COLUMN_GAP);
            }
            let cell = cells.get(i).map_or("", |cell| cell.as_ref());
            let alignment = self.alignments.get(i).copied().unwrap_or_default();
            let _ = write!(&mut line, "{}", pad(cell, width, alignment));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(text_width(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, fill),
        Alignment::Right => (fill, 0),
    };
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns_to_widest_cell() {
        let headers = [Cow::Borrowed("Person"), Cow::Borrowed("Balance")];
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows([
                [Cow::Borrowed("Ana (#1)"), Cow::Borrowed("+20.00")],
                [Cow::Borrowed("Bo (#2)"), Cow::Borrowed("-120.00")],
            ])
            .build();

        assert_eq!(
            table,
            "Person    Balance\n\
             --------  -------\n\
             Ana (#1)   +20.00\n\
             Bo (#2)   -120.00\n"
        );
    }

    #[test]
    fn missing_cells_pad_as_empty() {
        let headers = [Cow::Borrowed("ID"), Cow::Borrowed("Name")];
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Right])
            .headers(&headers)
            .rows([vec![Cow::Borrowed("7")]])
            .build();

        assert_eq!(table, "ID  Name\n--  ----\n 7\n");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let headers = [Cow::Borrowed("Item")];
        let table = TextTableBuilder::new()
            .headers(&headers)
            .rows([[Cow::Borrowed("pão")], [Cow::Borrowed("açaí")]])
            .build();

        assert_eq!(table, "Item\n----\npão\naçaí\n");
    }

    #[test]
    fn no_headers_means_no_table() {
        let table: String = TextTableBuilder::<[Cow<'_, str>; 1]>::new().build();
        assert!(table.is_empty());
    }
}
