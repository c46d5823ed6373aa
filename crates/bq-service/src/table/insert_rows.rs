use std::cell::RefCell;

const INSERT_ALL_KIND: &str = "bigquery#tableDataInsertAllRequest";

/// Options for `tabledata.insertAll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertRowOptions {
    pub skip_invalid_rows: bool,
    pub ignore_unknown_values: bool,
    pub trace_id: Option<uuid::Uuid>,
}

impl Default for InsertRowOptions {
    fn default() -> Self {
        Self {
            skip_invalid_rows: true,
            ignore_unknown_values: true,
            trace_id: None,
        }
    }
}

/// The insertAll envelope. Rows are consumed lazily while serializing,
/// each one wrapped with a fresh `insertId` for server side de-duplication.
pub(super) struct InsertRows<R>
where
    R: IntoIterator,
    R::Item: serde::Serialize,
{
    options: InsertRowOptions,
    rows: RowIter<R>,
}

impl<R> InsertRows<R>
where
    R: IntoIterator,
    R::Item: serde::Serialize,
{
    pub(super) fn new(options: InsertRowOptions, rows: R) -> Self {
        Self {
            options,
            rows: RowIter(RefCell::new(Some(rows))),
        }
    }
}

impl<R> serde::Serialize for InsertRows<R>
where
    R: IntoIterator,
    R::Item: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let field_count = 4 + self.options.trace_id.is_some() as usize;

        let mut map = serializer.serialize_map(Some(field_count))?;

        map.serialize_entry("kind", INSERT_ALL_KIND)?;
        map.serialize_entry("skipInvalidRows", &self.options.skip_invalid_rows)?;
        map.serialize_entry("ignoreUnknownValues", &self.options.ignore_unknown_values)?;

        if let Some(ref trace_id) = self.options.trace_id {
            map.serialize_entry("traceId", trace_id)?;
        }

        map.serialize_entry("rows", &self.rows)?;

        map.end()
    }
}

struct RowIter<R>(RefCell<Option<R>>);

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RowWrapper<R> {
    insert_id: uuid::Uuid,
    json: R,
}

impl<R> serde::Serialize for RowIter<R>
where
    R: IntoIterator,
    R::Item: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{Error, SerializeSeq};

        let rows = self
            .0
            .take()
            .ok_or_else(|| S::Error::custom("insertAll rows can only be serialized once"))?
            .into_iter();

        let len_hint = match rows.size_hint() {
            (low, Some(high)) if low == high => Some(low),
            _ => None,
        };

        let mut seq_ser = serializer.serialize_seq(len_hint)?;

        for json in rows {
            seq_ser.serialize_element(&RowWrapper {
                insert_id: uuid::Uuid::new_v4(),
                json,
            })?;
        }

        seq_ser.end()
    }
}
