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

/// small filesystem helpers for dataset and output directories

use std::{fs, io::{self, ErrorKind}, path::Path};
use crate::io_error;

/// file extension as str, None if there is none or it is not valid UTF-8
pub fn extension<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().extension()?.to_str()
}

pub fn has_extension (path: impl AsRef<Path>, ext: &str)->bool {
    extension( &path).is_some_and( |e| e.eq_ignore_ascii_case(ext))
}

/// create dir (including parents) if it does not exist, fail if an existing dir is read-only
pub fn ensure_writable_dir (path: impl AsRef<Path>)->io::Result<()> {
    let dir = path.as_ref();
    if !dir.is_dir() {
        return fs::create_dir_all( dir)
    }
    if fs::metadata( dir)?.permissions().readonly() {
        Err( io_error!( ErrorKind::PermissionDenied, "directory {:?} not writable", dir))
    } else {
        Ok(())
    }
}

/// make sure the parent dir of a file path exists
pub fn ensure_parent_dir (path: impl AsRef<Path>)->io::Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_writable_dir( dir),
        _ => Ok(())
    }
}

pub fn file_length (path: impl AsRef<Path>)->Option<u64> {
    fs::metadata(path).ok().map( |meta| meta.len())
}

pub fn is_non_empty_file (path: impl AsRef<Path>)->bool {
    let path = path.as_ref();
    path.is_file() && file_length(path).is_some_and( |len| len > 0)
}
