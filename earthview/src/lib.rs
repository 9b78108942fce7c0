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

/// conversion of EarthView dataset samples into viewable images.
/// The core is the `normalizer` module that turns raw records of the four subsets into decoded
/// images, the other modules provide record input (parquet), shard download and image export

use std::path::Path;
use serde::{Serialize,Deserialize};

mod errors;
pub use errors::*;

pub mod subsets;
pub use subsets::{SubsetId,SubsetDescriptor,SubsetTable};

pub mod record;
pub use record::{Record,Metadata};

pub mod convert;

pub mod normalizer;
pub use normalizer::{normalize,normalize_by_name,NormalizedRecord,Field};

pub mod parquet_records;
pub use parquet_records::{RecordReader,parquet_path,read_records};

pub mod download;
pub mod inspect;
pub mod export;

/// general dataset access configuration
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct EarthViewConfig {
    /// repository id of the dataset on the host
    pub dataset: String,

    /// base URL of the dataset host
    pub base_url: String,

    /// default dataset split
    pub split: String,

    pub subsets: SubsetTable,
}

impl Default for EarthViewConfig {
    fn default()->Self {
        EarthViewConfig {
            dataset: "satellogic/EarthView".to_string(),
            base_url: "https://huggingface.co".to_string(),
            split: "train".to_string(),
            subsets: SubsetTable::default(),
        }
    }
}

/// load config from a RON file, or use the built-in default if there is no path
pub fn load_config<P: AsRef<Path>> (path: Option<P>)->Result<EarthViewConfig> {
    Ok( earthview_common::configs::load_config_or_default( path)? )
}
