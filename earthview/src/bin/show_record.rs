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

use anyhow::Result;
use serde_json::Value;
use earthview_common::{define_cli,check_cli,init_tracing};
use earthview::{
    RecordReader, Record, parquet_path,
    inspect::{describe_value,value_range},
    record::METADATA
};

define_cli! { ARGS [about="show structure of EarthView parquet records"] =
    index: usize [help="index of first record to show", long, short, default_value="0"],
    count: usize [help="number of records to show", long, short='n', default_value="1"],
    source: String [help="subset name (reads dataset/<subset>/sample.parquet) or pathname of parquet file"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let path = parquet_path( &ARGS.source);
    let mut reader = RecordReader::open( &path)?;
    println!("{:?}: {} rows", path, reader.num_rows());

    for _ in 0..ARGS.index {
        if reader.next_value().transpose()?.is_none() { break }
    }

    for i in ARGS.index..ARGS.index + ARGS.count {
        let Some(row) = reader.next_value().transpose()? else { break };
        println!("\n--- record {i}");
        show_row( row)?;
    }

    Ok(())
}

fn show_row (row: Value)->Result<()> {
    if let Value::Object(members) = &row {
        for (k,v) in members {
            println!("  {k}: {}", describe_value(v));
        }
    }

    let record = Record::from_json( row)?;
    for (name, shape) in record.field_shapes() {
        let range = record.field(&name).and_then( value_range);
        match range {
            Some((min,max)) => println!("  {name} shape {shape:?}, values {min} to {max}"),
            None => println!("  {name} shape {shape:?}, no values")
        }
    }

    if let Some(metadata) = record.metadata() {
        let raw = metadata.is_raw();
        let parsed = metadata.clone().into_parsed()?;
        println!("  {METADATA} ({}):", if raw { "serialized" } else { "structured" });
        for (k,v) in &parsed {
            println!("    {k}: {v}");
        }
    }

    Ok(())
}
