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

/// RON based config loading.
/// Config users either load from an explicit path or fall back to the `Default` of the config type

use std::{fs, path::Path};
use serde::de::DeserializeOwned;
use tracing::debug;
use crate::errors::{Result,EarthViewCommonError};

pub fn load_config_from_str<T> (s: &str)->Result<T> where T: DeserializeOwned {
    Ok( ron::from_str(s)? )
}

pub fn load_config<T> (path: impl AsRef<Path>)->Result<T> where T: DeserializeOwned {
    let path = path.as_ref();
    if !path.is_file() {
        return Err( EarthViewCommonError::ConfigNotFound( format!("{path:?}")) )
    }
    debug!("loading config {:?}", path);
    let s = fs::read_to_string(path)?;
    load_config_from_str( &s)
}

/// load config from optional path, using the `Default` of T if there is none
pub fn load_config_or_default<T,P> (path: Option<P>)->Result<T> where T: DeserializeOwned + Default, P: AsRef<Path> {
    match path {
        Some(path) => load_config( path),
        None => Ok( T::default() )
    }
}
