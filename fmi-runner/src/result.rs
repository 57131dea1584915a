use std::{fmt::Display, io::Seek, path::Path, sync::Arc};

use arrow::{
    array::{Array, ArrayRef, AsArray, Float64Array},
    csv::{reader::Format, ReaderBuilder, WriterBuilder},
    datatypes::{DataType, Field, Float64Type, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};

use crate::error::SimulationError;

/// Relative tolerance used when comparing the result span against the requested interval.
const SPAN_TOLERANCE: f64 = 1e-9;

/// A single recorded point: the time and the value of every other column, cast to `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub values: Vec<f64>,
}

/// The time series produced by a [`crate::traits::Solver`].
///
/// Wraps a `RecordBatch` with a non-null `Float64` column named `time` whose values never decrease,
/// and at least one row.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    batch: RecordBatch,
    time_index: usize,
}

impl SimulationResult {
    pub const TIME_COLUMN: &'static str = "time";

    /// Check and normalize a `RecordBatch`. A numeric `time` column of another type is cast to
    /// `Float64`.
    pub fn try_new(batch: RecordBatch) -> Result<Self, SimulationError> {
        let time_index = batch
            .schema()
            .index_of(Self::TIME_COLUMN)
            .map_err(|_| SimulationError::MissingTimeColumn)?;

        if batch.num_rows() == 0 {
            return Err(SimulationError::EmptyResult);
        }

        let batch = if batch.column(time_index).data_type() != &DataType::Float64 {
            Self::cast_time(batch, time_index)?
        } else {
            batch
        };

        let time = batch.column(time_index).as_primitive::<Float64Type>();
        if time.null_count() > 0 {
            return Err(SimulationError::MissingTimeColumn);
        }
        if time.value(0).is_nan() {
            return Err(SimulationError::NonMonotonicTime { index: 0 });
        }
        if let Some(index) = time
            .values()
            .windows(2)
            .position(|pair| pair[1] < pair[0] || pair[1].is_nan())
        {
            return Err(SimulationError::NonMonotonicTime { index: index + 1 });
        }

        Ok(Self { batch, time_index })
    }

    fn cast_time(batch: RecordBatch, time_index: usize) -> Result<RecordBatch, ArrowError> {
        let schema = batch.schema();
        let fields = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                if i == time_index {
                    Arc::new(Field::new(Self::TIME_COLUMN, DataType::Float64, false))
                } else {
                    field.clone()
                }
            })
            .collect::<Vec<_>>();
        let columns = batch
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                if i == time_index {
                    arrow::compute::cast(column, &DataType::Float64)
                } else {
                    Ok(column.clone())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
    }

    /// Read a CSV file with a header row into a result.
    pub fn read_csv<P>(path: P) -> Result<Self, SimulationError>
    where
        P: AsRef<Path>,
    {
        let mut file = std::fs::File::open(&path)?;

        // Infer the columns with the first 100 records, reading every number as `Float64`
        let (inferred, _) = Format::default()
            .with_header(true)
            .infer_schema(&file, Some(100))?;
        file.rewind()?;
        let file_schema = Schema::new(
            inferred
                .fields()
                .iter()
                .map(|field| match field.data_type() {
                    DataType::Int64 | DataType::Float64 | DataType::Null => {
                        Field::new(field.name(), DataType::Float64, true)
                    }
                    _ => field.as_ref().clone(),
                })
                .collect::<Vec<_>>(),
        );

        log::debug!(
            "Read CSV file {:?}, with schema: {:?}",
            path.as_ref(),
            file_schema
                .fields()
                .iter()
                .map(|f| f.name())
                .collect::<Vec<_>>()
        );

        let schema = Arc::new(file_schema);
        let reader = ReaderBuilder::new(schema.clone())
            .with_header(true)
            .build(file)?;
        let batches = reader.collect::<Result<Vec<_>, _>>()?;

        Self::try_new(arrow::compute::concat_batches(&schema, &batches)?)
    }

    /// Write the result as CSV with a header row.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), ArrowError> {
        let mut writer = WriterBuilder::new().with_header(true).build(writer);
        writer.write(&self.batch)
    }

    pub fn times(&self) -> &Float64Array {
        self.batch
            .column(self.time_index)
            .as_primitive::<Float64Type>()
    }

    pub fn start_time(&self) -> f64 {
        self.times().value(0)
    }

    pub fn end_time(&self) -> f64 {
        let times = self.times();
        times.value(times.len() - 1)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    /// Always `false`, an empty result is rejected by [`SimulationResult::try_new`].
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Names of the recorded variables, excluding `time`.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.time_index)
            .map(|(_, field)| field.name().as_str())
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    /// All samples in time order, every variable cast to `f64`.
    pub fn samples(&self) -> Result<Vec<Sample>, SimulationError> {
        let columns = self
            .batch
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.time_index)
            .map(|(_, column)| arrow::compute::cast(column, &DataType::Float64))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .times()
            .values()
            .iter()
            .enumerate()
            .map(|(row, &time)| Sample {
                time,
                values: columns
                    .iter()
                    .map(|column| {
                        let column = column.as_primitive::<Float64Type>();
                        if column.is_null(row) {
                            f64::NAN
                        } else {
                            column.value(row)
                        }
                    })
                    .collect(),
            })
            .collect())
    }

    /// Check that the samples cover exactly `[start_time, final_time]`.
    pub fn check_span(&self, start_time: f64, final_time: f64) -> Result<(), SimulationError> {
        let (start, end) = (self.start_time(), self.end_time());
        if !time_eq(start, start_time) || !time_eq(end, final_time) {
            return Err(SimulationError::SpanMismatch {
                expected_start: start_time,
                expected_end: final_time,
                start,
                end,
            });
        }
        Ok(())
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }
}

fn time_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= SPAN_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

impl Display for SimulationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = arrow::util::pretty::pretty_format_batches(std::slice::from_ref(&self.batch))
            .map_err(|_| std::fmt::Error)?;
        write!(f, "{table}")
    }
}
