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

use std::str::FromStr;
use anyhow::Result;
use tracing::{info,warn};
use earthview_common::{define_cli,check_cli,init_tracing};
use earthview::{SubsetId, RecordReader, normalize, parquet_path, export::save_images};

define_cli! { ARGS [about="convert EarthView records of a parquet file into images"] =
    max: Option<usize> [help="max number of records to export", long, short],
    output_dir: String [help="image output directory", long, short, default_value="images"],
    subset: String [help="subset name (satellogic, sentinel_1, sentinel_2, neon)"],
    parquet_file: Option<String> [help="pathname of parquet file (default is dataset/<subset>/sample.parquet)"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let subset = SubsetId::from_str( &ARGS.subset)?;
    let path = parquet_path( ARGS.parquet_file.as_deref().unwrap_or( &ARGS.subset));
    let reader = RecordReader::open( &path)?;
    info!("exporting {} records of {:?}", reader.num_rows(), path);

    let mut n_saved = 0;
    for (i, rec) in reader.enumerate().take( ARGS.max.unwrap_or(usize::MAX)) {
        match rec.and_then( |rec| normalize( subset, rec)) {
            Ok(nrec) => {
                let stem = format!("{subset}_{i:04}");
                let paths = save_images( &nrec, &ARGS.output_dir, &stem)?;
                info!("saved {} files for record {}", paths.len(), i);
                n_saved += 1;
            }
            Err(e) => warn!("skipping record {}: {}", i, e)
        }
    }

    println!("saved images of {n_saved} records to {}", ARGS.output_dir);
    Ok(())
}
