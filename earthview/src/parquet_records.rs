/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/// record input from local parquet shard files

use std::{fs::File, path::{Path,PathBuf}};
use parquet::{file::reader::{FileReader,SerializedFileReader}, record::reader::RowIter};
use serde_json::Value;
use tracing::debug;

use crate::{errors::Result, record::Record, subsets::SubsetId};

/// root dir of local subset samples
pub const SAMPLE_DIR: &str = "dataset";

/// a known subset name maps to its local sample file "dataset/❬subset❭/sample.parquet",
/// everything else is taken as the pathname of a parquet file
pub fn parquet_path (subset_or_file: &str)->PathBuf {
    if SubsetId::is_subset_name( subset_or_file) {
        Path::new(SAMPLE_DIR).join( subset_or_file).join("sample.parquet")
    } else {
        PathBuf::from( subset_or_file)
    }
}

/// sequential reader of parquet rows. Rows are converted into JSON objects, which in turn get
/// converted into `Record`s if the reader is used as an iterator
pub struct RecordReader {
    rows: RowIter<'static>,
    num_rows: usize,
}

impl RecordReader {
    pub fn open (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = SerializedFileReader::new( file)?;
        let num_rows = reader.metadata().file_metadata().num_rows().max(0) as usize;
        debug!("opened {:?} with {} rows", path, num_rows);

        let rows = RowIter::from_file_into( Box::new(reader));
        Ok( RecordReader { rows, num_rows } )
    }

    pub fn num_rows (&self)->usize { self.num_rows }

    /// the next row as a JSON object, without any record conversion
    pub fn next_value (&mut self)->Option<Result<Value>> {
        self.rows.next().map( |row| Ok( row?.to_json_value() ))
    }
}

impl Iterator for RecordReader {
    type Item = Result<Record>;

    fn next (&mut self)->Option<Self::Item> {
        self.next_value().map( |v| Record::from_json( v?))
    }
}

/// read up to `max` records of a parquet file
pub fn read_records (path: impl AsRef<Path>, max: Option<usize>)->Result<Vec<Record>> {
    let reader = RecordReader::open( path)?;
    reader.take( max.unwrap_or(usize::MAX)).collect()
}
