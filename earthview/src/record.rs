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

/// raw dataset records as they come out of the row reader

use std::collections::BTreeMap;
use ndarray::{ArrayD,IxDyn};
use serde_json::{Map,Value};

use crate::errors::{Result,EarthViewError,metadata_error,shape_mismatch};

pub const METADATA: &str = "metadata";

/// the metadata block of a record, which the dataset stores either as serialized JSON or as a struct
#[derive(Debug,Clone,PartialEq)]
pub enum Metadata {
    Raw(String),
    Parsed(Map<String,Value>)
}

impl Metadata {
    pub fn from_value (v: Value)->Result<Metadata> {
        match v {
            Value::String(s) => Ok( Metadata::Raw(s) ),
            Value::Object(map) => Ok( Metadata::Parsed(map) ),
            other => Err( metadata_error( format!("expected JSON string or object, got {}", json_type_name(&other))) )
        }
    }

    /// turn into a structured mapping. This is a no-op for already parsed metadata
    pub fn into_parsed (self)->Result<Map<String,Value>> {
        match self {
            Metadata::Parsed(map) => Ok(map),
            Metadata::Raw(s) => {
                let v = serde_json::from_str::<Value>(&s).map_err( |e| metadata_error( format!("{METADATA}: {e}")))?;
                match v {
                    Value::Object(map) => Ok(map),
                    other => Err( metadata_error( format!("serialized metadata is a {}, not an object", json_type_name(&other))) )
                }
            }
        }
    }

    pub fn is_raw (&self)->bool {
        matches!( self, Metadata::Raw(_))
    }
}

/// a single dataset item: an optional metadata block plus raster fields.
/// Raster fields are n-dimensional arrays with the revisit axis first
#[derive(Debug,Clone,Default)]
pub struct Record {
    metadata: Option<Metadata>,
    fields: BTreeMap<String,ArrayD<f64>>
}

impl Record {
    pub fn new ()->Self {
        Record::default()
    }

    /// build a record from a JSON object row. The "metadata" member becomes the metadata block,
    /// every other member has to be a regular nested numeric array
    pub fn from_json (row: Value)->Result<Record> {
        let members = match row {
            Value::Object(members) => members,
            other => return Err( EarthViewError::IllegalArgument( format!("record row is a {}, not an object", json_type_name(&other))))
        };

        let mut record = Record::new();
        for (k,v) in members {
            if k == METADATA {
                record.metadata = Some( Metadata::from_value(v)? );
            } else {
                let array = nested_array( &k, &v)?;
                record.fields.insert( k, array);
            }
        }
        Ok(record)
    }

    pub fn with_metadata (mut self, metadata: Metadata)->Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_field (mut self, name: impl ToString, array: ArrayD<f64>)->Self {
        self.fields.insert( name.to_string(), array);
        self
    }

    /// insert a field given as nested JSON arrays
    pub fn insert_nested (&mut self, name: &str, v: &Value)->Result<()> {
        let array = nested_array( name, v)?;
        self.fields.insert( name.to_string(), array);
        Ok(())
    }

    pub fn metadata (&self)->Option<&Metadata> { self.metadata.as_ref() }

    pub fn field (&self, name: &str)->Option<&ArrayD<f64>> { self.fields.get(name) }

    pub fn field_names (&self)->impl Iterator<Item=&str> {
        self.fields.keys().map( |k| k.as_str())
    }

    pub fn len (&self)->usize { self.fields.len() }

    pub fn is_empty (&self)->bool { self.fields.is_empty() }

    /// field name and array shape of each raster field
    pub fn field_shapes (&self)->Vec<(String,Vec<usize>)> {
        self.fields.iter().map( |(k,a)| (k.clone(), a.shape().to_vec())).collect()
    }

    pub fn into_parts (self)->(Option<Metadata>, BTreeMap<String,ArrayD<f64>>) {
        (self.metadata, self.fields)
    }
}

/// convert nested JSON arrays of numbers into an n-dimensional array.
/// The shape is taken from the first element at each nesting level, all other elements have to match it
pub fn nested_array (field: &str, v: &Value)->Result<ArrayD<f64>> {
    let shape = probe_shape(v);
    let mut data: Vec<f64> = Vec::with_capacity( shape.iter().product());
    flatten( field, v, &shape, 0, &mut data)?;
    Ok( ArrayD::from_shape_vec( IxDyn(&shape), data)? )
}

fn probe_shape (v: &Value)->Vec<usize> {
    let mut shape = Vec::new();
    let mut cur = v;
    while let Value::Array(elems) = cur {
        shape.push( elems.len());
        match elems.first() {
            Some(first) => cur = first,
            None => break
        }
    }
    shape
}

fn flatten (field: &str, v: &Value, shape: &[usize], depth: usize, data: &mut Vec<f64>)->Result<()> {
    if depth == shape.len() {
        match v.as_f64() {
            Some(x) => { data.push(x); Ok(()) }
            None => Err( shape_mismatch( field, format!("expected number at depth {depth}, got {}", json_type_name(v))) )
        }
    } else {
        match v {
            Value::Array(elems) => {
                if elems.len() != shape[depth] {
                    return Err( shape_mismatch( field, format!("irregular nesting at depth {depth}: expected {} elements, got {}", shape[depth], elems.len())))
                }
                for e in elems {
                    flatten( field, e, shape, depth+1, data)?;
                }
                Ok(())
            }
            other => Err( shape_mismatch( field, format!("expected array at depth {depth}, got {}", json_type_name(other))) )
        }
    }
}

pub fn json_type_name (v: &Value)->&'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
