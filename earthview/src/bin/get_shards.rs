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
use anyhow::{Result,anyhow};
use tracing::{info,warn};
use earthview_common::{define_cli,check_cli,init_tracing};
use earthview::{SubsetId, load_config, download::download_shard};

define_cli! { ARGS [about="download EarthView parquet shards of a subset"] =
    config: Option<String> [help="pathname of RON config (uses built-in defaults if not set)", long],
    split: Option<String> [help="dataset split (overrides config)", long],
    random: Option<usize> [help="number of randomly selected shards to add", long, short],
    output_dir: String [help="download directory", long, short, default_value="dataset"],
    subset: String [help="subset name (satellogic, sentinel_1, sentinel_2, neon)"],
    shards: Vec<u32> [help="shard indices"]
}

fn main()->Result<()> {
    check_cli!(ARGS);
    init_tracing();

    let config = load_config( ARGS.config.as_deref())?;
    let subset = SubsetId::from_str( &ARGS.subset)?;
    let split = ARGS.split.clone().unwrap_or_else( || config.split.clone());

    let mut shards = ARGS.shards.clone();
    if let Some(n) = ARGS.random {
        shards.extend( config.subsets.sample_shards( subset, n, &mut rand::rng())?);
    }
    if shards.is_empty() {
        return Err( anyhow!("no shards selected (use shard indices or --random)"))
    }
    info!("selected shards: {:?}", shards);

    let client = reqwest::blocking::Client::builder().build()?;
    let mut n_downloaded = 0;

    for (shard, file) in shards.iter().zip( config.subsets.shard_files( subset, &split, &shards)?) {
        match download_shard( &client, &config, &file, &ARGS.output_dir) {
            Ok(path) => {
                println!("{}", path.display());
                n_downloaded += 1;
            }
            Err(e) => warn!("error loading shard {}: {}", shard, e)
        }
    }

    if n_downloaded == 0 {
        Err( anyhow!("failed to download any shard"))
    } else {
        info!("downloaded {} of {} shards", n_downloaded, shards.len());
        Ok(())
    }
}
