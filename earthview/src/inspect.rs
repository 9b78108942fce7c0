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

/// helpers for manual inspection of raw rows with unknown structure

use ndarray::ArrayD;
use serde_json::Value;
use crate::record::json_type_name;

/// nesting summary of a JSON value, following the first element of each list, e.g.
/// "list[2] > list[3] > list[384] > list[384] of number"
pub fn describe_value (v: &Value)->String {
    let mut levels: Vec<String> = Vec::new();
    let mut cur = v;

    loop {
        match cur {
            Value::Array(elems) => {
                levels.push( format!("list[{}]", elems.len()));
                match elems.first() {
                    Some(first) => cur = first,
                    None => return levels.join(" > ")
                }
            }
            Value::Object(members) => {
                let keys: Vec<&str> = members.keys().map( |k| k.as_str()).collect();
                let leaf = format!("object{{{}}}", keys.join(","));
                return with_leaf( levels, &leaf)
            }
            Value::String(s) => return with_leaf( levels, &format!("string({})", s.len())),
            other => return with_leaf( levels, json_type_name(other))
        }
    }
}

fn with_leaf (levels: Vec<String>, leaf: &str)->String {
    if levels.is_empty() {
        leaf.to_string()
    } else {
        format!("{} of {}", levels.join(" > "), leaf)
    }
}

/// min and max sample value of a raster field, None if it is empty
pub fn value_range (a: &ArrayD<f64>)->Option<(f64,f64)> {
    a.iter().fold( None, |acc, &v| match acc {
        None => Some((v,v)),
        Some((min,max)) => Some(( min.min(v), max.max(v) ))
    })
}
