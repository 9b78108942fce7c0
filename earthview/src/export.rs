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

use std::{fs, path::{Path,PathBuf}};
use tracing::debug;
use earthview_common::fs::ensure_writable_dir;

use crate::{errors::Result, normalizer::{Field,NormalizedRecord}};

/// save all images of a normalized record as "❬stem❭_❬field❭_❬revisit❭.png" and its metadata
/// as "❬stem❭_metadata.json" into `dir`. Returns the paths of the written files
pub fn save_images (nrec: &NormalizedRecord, dir: impl AsRef<Path>, stem: &str)->Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    ensure_writable_dir( dir)?;
    let mut paths = Vec::new();

    for (name, field) in &nrec.fields {
        if let Field::Images(images) = field {
            for (i, img) in images.iter().enumerate() {
                let path = dir.join( format!("{stem}_{name}_{i:02}.png"));
                img.save( &path)?;
                debug!("saved {:?}", path);
                paths.push( path);
            }
        }
    }

    let path = dir.join( format!("{stem}_metadata.json"));
    fs::write( &path, serde_json::to_string_pretty( &nrec.metadata)?)?;
    paths.push( path);

    Ok(paths)
}
