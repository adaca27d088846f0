//! Table: the in-memory dataset handed to the publisher, backed by Apache Arrow

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow_csv::{ReaderBuilder as CsvReaderBuilder, WriterBuilder as CsvWriterBuilder};

use crate::error::{PublishError, PublishResult};

/// Number of rows sampled when inferring the schema of a CSV file.
const CSV_INFER_ROWS: usize = 100;

/// A single named column of homogeneous data
#[derive(Clone)]
pub struct Column {
    name: String,
    array: ArrayRef,
}

impl Column {
    /// Create a column from an existing Arrow array
    #[must_use]
    pub fn new(name: impl Into<String>, array: ArrayRef) -> Self {
        Self {
            name: name.into(),
            array,
        }
    }

    #[must_use]
    pub fn from_bools(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self::new(name, Arc::new(BooleanArray::from(values)) as ArrayRef)
    }

    #[must_use]
    pub fn from_ints(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(name, Arc::new(Int64Array::from(values)) as ArrayRef)
    }

    #[must_use]
    pub fn from_floats(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, Arc::new(Float64Array::from(values)) as ArrayRef)
    }

    #[must_use]
    pub fn from_strings(name: impl Into<String>, values: Vec<&str>) -> Self {
        Self::new(name, Arc::new(StringArray::from(values)) as ArrayRef)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data_type(&self) -> &DataType {
        self.array.data_type()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }
}

/// A rectangular dataset with named, typed columns.
///
/// The publisher only ever reads a `Table`; it is owned by the caller.
#[derive(Clone)]
pub struct Table {
    /// Column names and types
    schema: SchemaRef,
    /// Row data, possibly split across several batches
    batches: Vec<RecordBatch>,
}

impl Table {
    /// Create a table with columns but no rows
    #[must_use]
    pub fn empty(schema: SchemaRef) -> Self {
        Self {
            schema,
            batches: Vec::new(),
        }
    }

    /// Create a table from multiple RecordBatches
    ///
    /// # Errors
    /// Returns error if any batch does not match `schema`
    pub fn from_batches(schema: SchemaRef, batches: Vec<RecordBatch>) -> PublishResult<Self> {
        for (i, batch) in batches.iter().enumerate() {
            if batch.schema() != schema {
                return Err(PublishError::Schema(format!(
                    "batch {i} has incompatible schema"
                )));
            }
        }
        Ok(Self { schema, batches })
    }

    /// Create a table from columns, preserving their order
    ///
    /// # Errors
    /// Returns error if columns have different lengths or repeat a name
    pub fn from_columns(columns: Vec<Column>) -> PublishResult<Self> {
        let Some(first) = columns.first() else {
            return Ok(Self::empty(Arc::new(Schema::empty())));
        };

        let len = first.len();
        let mut seen = HashSet::new();
        for col in &columns {
            if col.len() != len {
                return Err(PublishError::Schema(format!(
                    "column '{}' has {} rows, expected {}",
                    col.name(),
                    col.len(),
                    len
                )));
            }
            if !seen.insert(col.name()) {
                return Err(PublishError::Schema(format!(
                    "duplicate column name '{}'",
                    col.name()
                )));
            }
        }

        let fields: Vec<Field> = columns
            .iter()
            .map(|c| Field::new(c.name(), c.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let arrays: Vec<ArrayRef> = columns.into_iter().map(|c| c.array).collect();
        let batch = RecordBatch::try_new(schema.clone(), arrays)?;

        Ok(Self {
            schema,
            batches: vec![batch],
        })
    }

    #[must_use]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Column names in table order
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// True when the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Write the table as comma-delimited CSV with a header row
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> PublishResult<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_csv_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize the table to CSV in memory
    ///
    /// # Errors
    /// Returns error if a batch cannot be encoded
    pub fn to_csv_bytes(&self) -> PublishResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv_to(&mut buf)?;
        Ok(buf)
    }

    /// Write CSV to an arbitrary sink.
    ///
    /// The header row is emitted even when the table has no rows.
    pub(crate) fn write_csv_to<W: Write>(&self, sink: W) -> PublishResult<()> {
        let empty;
        let batches = if self.batches.is_empty() {
            empty = [RecordBatch::new_empty(self.schema.clone())];
            &empty[..]
        } else {
            &self.batches[..]
        };

        let mut csv_writer = CsvWriterBuilder::new()
            .with_header(true)
            .with_delimiter(b',')
            .build(sink);

        for batch in batches {
            csv_writer.write(batch)?;
        }
        Ok(())
    }

    /// Read a CSV file with a header row into a table.
    ///
    /// Column types are inferred from the first rows of the file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid CSV
    pub fn read_csv<P: AsRef<Path>>(path: P) -> PublishResult<Self> {
        let mut file = File::open(path.as_ref())?;

        let (schema, _) = arrow_csv::reader::Format::default()
            .with_header(true)
            .with_delimiter(b',')
            .infer_schema(BufReader::new(&mut file), Some(CSV_INFER_ROWS))?;
        file.seek(SeekFrom::Start(0))?;

        let schema_ref: SchemaRef = Arc::new(schema);
        let csv_reader = CsvReaderBuilder::new(schema_ref.clone())
            .with_header(true)
            .with_delimiter(b',')
            .build(BufReader::new(file))?;

        let batches = csv_reader.collect::<Result<Vec<_>, _>>()?;
        Self::from_batches(schema_ref, batches)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.column_names())
            .field("rows", &self.num_rows())
            .finish()
    }
}
