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

use earthview_common::define_error;

pub type Result<T> = std::result::Result<T, EarthViewError>;

define_error!{ pub EarthViewError =
    UnknownSubset(String) : "unknown subset: {0}",
    MissingField(String,String) : "missing field '{1}' in {0} record",
    ShapeMismatch(String,String) : "shape mismatch in field '{0}': {1}",
    MetadataError(String) : "invalid metadata: {0}",
    JsonError(#[from] serde_json::Error) : "JSON error: {0}",
    ArrayShapeError(#[from] ndarray::ShapeError) : "array shape error: {0}",
    ImageError(#[from] image::ImageError) : "image error: {0}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    ParquetError(#[from] parquet::errors::ParquetError) : "parquet error: {0}",
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    ConfigError(#[from] earthview_common::EarthViewCommonError) : "config error: {0}",
    IllegalArgument(String) : "illegal argument: {0}"
}

pub fn missing_field (subset: impl ToString, field: impl ToString)->EarthViewError {
    EarthViewError::MissingField( subset.to_string(), field.to_string())
}

pub fn shape_mismatch (field: impl ToString, msg: impl ToString)->EarthViewError {
    EarthViewError::ShapeMismatch( field.to_string(), msg.to_string())
}

pub fn metadata_error (msg: impl ToString)->EarthViewError {
    EarthViewError::MetadataError( msg.to_string())
}

pub fn illegal_argument (msg: impl ToString)->EarthViewError {
    EarthViewError::IllegalArgument( msg.to_string())
}
