use super::Unset;
use crate::table::{FieldMode, FieldType, TableFieldSchema};

/// Builds a [`TableFieldSchema`], requiring a type before a mode can finish it:
///
/// `TableFieldSchema::builder("age").int().nullable()`
#[derive(Debug, Clone, PartialEq)]
pub struct TableFieldSchemaBuilder<S, Ty> {
    name: S,
    ty: Ty,
    description: Option<S>,
    fields: Vec<TableFieldSchema<S>>,
}

impl<S> TableFieldSchemaBuilder<S, Unset> {
    pub(crate) const fn new(name: S) -> Self {
        Self {
            name,
            ty: Unset,
            description: None,
            fields: Vec::new(),
        }
    }
}

macro_rules! define_ty_builder_fn {
    ($($name:ident($ty_variant:ident)),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(self) -> TableFieldSchemaBuilder<S, FieldType> {
                self.with_type(FieldType::$ty_variant)
            }
        )*
    };
}

impl<S> TableFieldSchemaBuilder<S, Unset> {
    fn with_type(self, ty: FieldType) -> TableFieldSchemaBuilder<S, FieldType> {
        TableFieldSchemaBuilder {
            name: self.name,
            ty,
            description: self.description,
            fields: self.fields,
        }
    }

    /// A `RECORD` field made up of the given sub-fields.
    pub fn record<I>(mut self, fields: I) -> TableFieldSchemaBuilder<S, FieldType>
    where
        I: IntoIterator<Item = TableFieldSchema<S>>,
    {
        self.fields.extend(fields);
        self.with_type(FieldType::Record)
    }

    define_ty_builder_fn! {
        string(String),
        bytes(Bytes),
        int(Integer),
        float(Float),
        numeric(Numeric),
        geography(Geography),
        json(Json),
        bool(Bool),
        timestamp(Timestamp),
        time(Time),
        date(Date),
        datetime(DateTime),
    }
}

impl<S, Ty> TableFieldSchemaBuilder<S, Ty> {
    pub fn description(mut self, description: S) -> Self {
        self.description = Some(description);
        self
    }
}

macro_rules! define_mode_builder_fn {
    ($($name:ident($mode_variant:ident)),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(self) -> TableFieldSchema<S> {
                self.build_with_mode(FieldMode::$mode_variant)
            }
        )*
    };
}

impl<S> TableFieldSchemaBuilder<S, FieldType> {
    fn build_with_mode(self, mode: FieldMode) -> TableFieldSchema<S> {
        TableFieldSchema {
            name: self.name,
            ty: self.ty,
            mode,
            description: self.description,
            fields: self.fields,
        }
    }

    define_mode_builder_fn! {
        required(Required),
        repeated(Repeated),
        nullable(Nullable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableSchema;

    #[test]
    fn test_build_schema() {
        let schema = TableSchema::new(vec![
            TableFieldSchema::builder("firstname").string().required(),
            TableFieldSchema::builder("age")
                .int()
                .description("age in years")
                .nullable(),
            TableFieldSchema::builder("tags").string().repeated(),
            TableFieldSchema::builder("address")
                .record([TableFieldSchema::builder("city").string().nullable()])
                .nullable(),
        ]);

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            serde_json::json!({
                "fields": [
                    {"name": "firstname", "type": "STRING", "mode": "REQUIRED"},
                    {"name": "age", "type": "INTEGER", "mode": "NULLABLE", "description": "age in years"},
                    {"name": "tags", "type": "STRING", "mode": "REPEATED"},
                    {"name": "address", "type": "RECORD", "mode": "NULLABLE", "fields": [
                        {"name": "city", "type": "STRING", "mode": "NULLABLE"}
                    ]},
                ]
            })
        );
    }
}
