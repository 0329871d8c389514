use tstream_api::{ColumnInfo, Row, ScanType, Value};

use crate::decode::decode_column;
use crate::error::DecodeError;

/// Position of a [`Rows`] cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing pulled yet.
    Created,
    Advancing,
    /// End of data was reported. Stays here.
    Exhausted,
}

/// Outcome of one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The destination holds the next row.
    Row,
    /// No more rows. Not an error.
    EndOfRows,
}

/// Forward-only cursor over a fully buffered result set.
///
/// Rows are decoded one at a time as the caller advances; each row's wire
/// data is handed to the decoder and dropped afterwards, there is no rewind.
pub struct Rows {
    columns: Vec<ColumnInfo>,
    names: Vec<String>,
    rows: std::vec::IntoIter<Row>,
    total: usize,
    pos: usize,
    state: CursorState,
}

impl std::fmt::Debug for Rows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("columns", &self.names)
            .field("pos", &self.pos)
            .field("total", &self.total)
            .field("state", &self.state)
            .finish()
    }
}

impl Rows {
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        let names = columns.iter().map(|c| c.display_name().to_string()).collect();
        let total = rows.len();
        Self {
            columns,
            names,
            rows: rows.into_iter(),
            total,
            pos: 0,
            state: CursorState::Created,
        }
    }

    // ---- column metadata ----

    pub fn columns(&self) -> &[String] {
        &self.names
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_info(&self, index: usize) -> Option<&ColumnInfo> {
        self.columns.get(index)
    }

    /// Scalar tag of the column, or `UNKNOWN` for arrays and columns
    /// outside the descriptor list.
    pub fn column_type_database_type_name(&self, index: usize) -> &str {
        self.column_info(index)
            .map(ColumnInfo::database_type_name)
            .unwrap_or(tstream_api::DATABASE_TYPE_UNKNOWN)
    }

    pub fn column_type_scan_type(&self, index: usize) -> ScanType {
        self.column_info(index).map(ColumnInfo::scan_type).unwrap_or(ScanType::Any)
    }

    // ---- position ----

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Number of rows consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total number of buffered rows.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Decode the next row into `dest`, one slot per column.
    ///
    /// A row that fails to decode is still consumed; rows delivered before
    /// it stay valid. A row whose length differs from the column count is
    /// rejected before `dest` is touched; a cell decode failure may leave
    /// `dest` partially overwritten. An undersized `dest` consumes nothing.
    pub fn next_into(&mut self, dest: &mut [Value]) -> Result<Advance, DecodeError> {
        if dest.len() < self.columns.len() {
            return Err(DecodeError::DestinationTooSmall {
                columns: self.columns.len(),
                slots: dest.len(),
            });
        }
        let Some(row) = self.rows.next() else {
            if self.state != CursorState::Exhausted {
                tracing::trace!(rows = self.total, "result set exhausted");
            }
            self.state = CursorState::Exhausted;
            return Ok(Advance::EndOfRows);
        };
        self.state = CursorState::Advancing;
        self.pos += 1;

        if row.len() != self.columns.len() {
            return Err(DecodeError::ColumnCountMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (i, datum) in row.0.into_iter().enumerate() {
            dest[i] = decode_column(datum, &self.columns[i])?;
        }
        Ok(Advance::Row)
    }

    /// Decode the next row into a fresh vector; `None` at end of data.
    pub fn next_row(&mut self) -> Result<Option<Vec<Value>>, DecodeError> {
        let mut dest = vec![Value::Null; self.columns.len()];
        match self.next_into(&mut dest)? {
            Advance::Row => Ok(Some(dest)),
            Advance::EndOfRows => Ok(None),
        }
    }
}

impl Iterator for Rows {
    type Item = Result<Vec<Value>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
