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

/// blocking download of single shard files from the dataset host. There are no retries,
/// callers decide what to do with failed shards

use std::{env, fs::{self,File}, io::{self,Read}, path::{Path,PathBuf}};
use reqwest::blocking::Client;
use tracing::info;
use earthview_common::fs::{ensure_parent_dir,is_non_empty_file};

use crate::{EarthViewConfig, errors::Result};

/// environment variable that holds the optional access token of the dataset host
pub const HF_TOKEN: &str = "HF_TOKEN";

pub fn hf_token ()->Option<String> {
    env::var(HF_TOKEN).ok().filter( |s| !s.is_empty())
}

/// the download URL of a repository relative shard file
pub fn shard_url (config: &EarthViewConfig, file: &str)->String {
    format!("{}/datasets/{}/resolve/main/{}", config.base_url.trim_end_matches('/'), config.dataset, file)
}

/// download a repository relative shard file into `dir`, keeping its relative path.
/// Already downloaded (non-empty) files are not fetched again
pub fn download_shard (client: &Client, config: &EarthViewConfig, file: &str, dir: impl AsRef<Path>)->Result<PathBuf> {
    let path = dir.as_ref().join( file);
    if is_non_empty_file( &path) {
        info!("file {} already downloaded", file);
        return Ok(path)
    }
    ensure_parent_dir( &path)?;

    let url = shard_url( config, file);
    info!("downloading {}..", url);

    let mut request = client.get( &url);
    if let Some(token) = hf_token() {
        request = request.bearer_auth( token);
    }
    let mut response = request.send()?.error_for_status()?;

    let len = save_body( &mut response, &path)?;
    info!("{} kB saved to {:?}", len / 1024, path);
    Ok(path)
}

/// write a response body to `path` via a ".part" file that is renamed when complete.
/// The part file is removed if the body cannot be read or written
pub fn save_body<R: Read> (body: &mut R, path: &Path)->Result<u64> {
    let part_path = path.with_extension("part");
    match write_part( body, &part_path) {
        Ok(len) => {
            fs::rename( &part_path, path)?;
            Ok(len)
        }
        Err(e) => {
            let _ = fs::remove_file( &part_path);
            Err(e)
        }
    }
}

fn write_part<R: Read> (body: &mut R, part_path: &Path)->Result<u64> {
    let mut out = File::create( part_path)?;
    Ok( io::copy( body, &mut out)? )
}
