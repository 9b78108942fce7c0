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

/// the subset image normalizer, which turns raw dataset records into decoded images and
/// repaired metadata. Each subset has its own fixed conversion recipe

use std::{collections::BTreeMap, str::FromStr};
use image::DynamicImage;
use ndarray::{Array2,Array4,ArrayD,ArrayView2,ArrayView3,Axis,Ix4,Slice,Zip,stack};
use serde_json::{Map,Value};
use tracing::debug;

use crate::{
    convert::{ImageMode,chw_to_hwc,decode,expect_rank,gray_image,narrow_u8,rgb_image,squeeze_channels,to_u8_array},
    errors::{Result,metadata_error,missing_field,shape_mismatch},
    record::{METADATA,Record,json_type_name},
    subsets::SubsetId,
};

pub const COUNT: &str = "count";

const RADAR_RATIO_OFFSET: f64 = 0.01;
const RADAR_RATIO_SCALE: f64 = 256.0;

const OPTICAL_BANDS: [&str;4] = ["10m", "20m", "rgb", "scl"];
const OPTICAL_20M_CHANNELS: [usize;3] = [0, 2, 4];
const OPTICAL_ANGLE_FIELDS: [&str;3] = ["solarAngles", "tileGeometry", "viewIncidenceAngles"];

/// upper bounds of the first two hyperspectral band groups. The third group takes the remaining bands
const HYPERSPECTRAL_GROUP_BOUNDS: [usize;2] = [124, 247];
const EPSG_4326: &str = "EPSG:4326";

/// a normalized record field: either decoded images (one per revisit) or an unconverted u8 array
#[derive(Debug,Clone)]
pub enum Field {
    Images(Vec<DynamicImage>),
    Array(ArrayD<u8>)
}

#[derive(Debug,Clone)]
pub struct NormalizedRecord {
    pub subset: SubsetId,
    pub metadata: Map<String,Value>,
    pub fields: BTreeMap<String,Field>
}

impl NormalizedRecord {
    pub fn images (&self, name: &str)->Option<&[DynamicImage]> {
        match self.fields.get(name) {
            Some(Field::Images(images)) => Some(images.as_slice()),
            _ => None
        }
    }

    pub fn array (&self, name: &str)->Option<&ArrayD<u8>> {
        match self.fields.get(name) {
            Some(Field::Array(a)) => Some(a),
            _ => None
        }
    }

    pub fn count (&self)->Option<u64> {
        self.metadata.get(COUNT).and_then( |v| v.as_u64())
    }
}

/// convert a raw record of the given subset.
/// All raster fields are narrowed to u8 first (see `convert::narrow_u8`), then the subset specific
/// fields are decoded into images. `metadata.count` is set to the revisit count of the primary field
pub fn normalize (subset: SubsetId, record: Record)->Result<NormalizedRecord> {
    let (metadata, raw_fields) = record.into_parts();
    let metadata = metadata.ok_or_else( || missing_field( subset, METADATA))?.into_parsed()?;
    debug!("normalizing {} record with {} raster fields", subset, raw_fields.len());

    let mut fields: BTreeMap<String,ArrayD<u8>> = raw_fields.into_iter()
        .map( |(k,a)| (k, to_u8_array(&a)))
        .collect();

    let mut nrec = NormalizedRecord { subset, metadata, fields: BTreeMap::new() };

    let count = match subset {
        SubsetId::Aerial => normalize_aerial( &mut fields, &mut nrec)?,
        SubsetId::Radar => normalize_radar( &mut fields, &mut nrec)?,
        SubsetId::Optical => normalize_optical( &mut fields, &mut nrec)?,
        SubsetId::Hyperspectral => normalize_hyperspectral( &mut fields, &mut nrec)?,
    };
    nrec.metadata.insert( COUNT.to_string(), Value::from(count));

    for (k,a) in fields {
        nrec.fields.insert( k, Field::Array(a));
    }

    Ok(nrec)
}

pub fn normalize_by_name (subset: &str, record: Record)->Result<NormalizedRecord> {
    normalize( SubsetId::from_str(subset)?, record)
}

fn take_field (fields: &mut BTreeMap<String,ArrayD<u8>>, subset: SubsetId, name: &str)->Result<ArrayD<u8>> {
    fields.remove(name).ok_or_else( || missing_field( subset, name))
}

fn set_images (nrec: &mut NormalizedRecord, name: &str, images: Vec<DynamicImage>)->usize {
    let n = images.len();
    nrec.fields.insert( name.to_string(), Field::Images(images));
    n
}

/// [N,3,H,W] revisits as RGB images
fn rgb_revisits (name: &str, a: &ArrayD<u8>)->Result<Vec<DynamicImage>> {
    let a = expect_rank::<Ix4>( name, a.view(), "[N,3,H,W]")?;
    a.axis_iter( Axis(0))
        .map( |chw| rgb_image( name, chw_to_hwc(chw)).map( DynamicImage::ImageRgb8))
        .collect()
}

/// first channel of [N,C,H,W] revisits as single channel images
fn first_channel_revisits (name: &str, a: &ArrayD<u8>)->Result<Vec<DynamicImage>> {
    let a = expect_rank::<Ix4>( name, a.view(), "[N,C,H,W]")?;
    if a.shape()[1] == 0 {
        return Err( shape_mismatch( name, "revisits have no channels"))
    }
    a.axis_iter( Axis(0))
        .map( |chw| gray_image( name, chw.index_axis_move( Axis(0), 0)).map( DynamicImage::ImageLuma8))
        .collect()
}

/* #region aerial ******************************************************************************************/

fn normalize_aerial (fields: &mut BTreeMap<String,ArrayD<u8>>, nrec: &mut NormalizedRecord)->Result<usize> {
    let subset = nrec.subset;

    let rgb = take_field( fields, subset, "rgb")?;
    set_images( nrec, "rgb", rgb_revisits( "rgb", &rgb)?);

    let m1 = take_field( fields, subset, "1m")?;
    Ok( set_images( nrec, "1m", first_channel_revisits( "1m", &m1)?) )
}

/* #endregion aerial */

/* #region radar *******************************************************************************************/

/// the synthetic third channel of radar composites, computed from V and H polarization values.
/// This is a visualization heuristic, the result saturates at 255
#[inline]
pub fn radar_ratio (v: u8, h: u8)->u8 {
    narrow_u8( v as f64 / (h as f64 + RADAR_RATIO_OFFSET) * RADAR_RATIO_SCALE)
}

/// [H,W,3] composite of the V and H planes plus their ratio
fn radar_composite (v: ArrayView2<u8>, h: ArrayView2<u8>)->Result<ndarray::Array3<u8>> {
    let ratio: Array2<u8> = Zip::from(&v).and(&h).map_collect( |&v,&h| radar_ratio(v,h));
    Ok( stack( Axis(2), &[v, h, ratio.view()])? )
}

fn normalize_radar (fields: &mut BTreeMap<String,ArrayD<u8>>, nrec: &mut NormalizedRecord)->Result<usize> {
    let subset = nrec.subset;
    let name = "10m";

    let a = take_field( fields, subset, name)?;
    let a = expect_rank::<Ix4>( name, a.view(), "[N,2,H,W]")?;
    if a.shape()[1] != 2 {
        return Err( shape_mismatch( name, format!("expected 2 polarization channels, got {}", a.shape()[1])))
    }

    let images = a.axis_iter( Axis(0))
        .map( |chw| {
            let composite = radar_composite( chw.index_axis( Axis(0), 0), chw.index_axis( Axis(0), 1))?;
            Ok( DynamicImage::ImageRgb8( rgb_image( name, composite.view())?) )
        })
        .collect::<Result<Vec<DynamicImage>>>()?;

    Ok( set_images( nrec, name, images) )
}

/* #endregion radar */

/* #region optical *****************************************************************************************/

fn optical_mode (band: &str)->ImageMode {
    match band {
        "10m" | "scl" => ImageMode::Luma,
        _ => ImageMode::Rgb
    }
}

/// [N,C,H,W] -> [N,H,W,C], with channel selection for the 20m band
fn optical_revisits (band: &str, a: &ArrayD<u8>)->Result<Array4<u8>> {
    let a = expect_rank::<Ix4>( band, a.view(), "[N,C,H,W]")?;
    let nhwc = a.permuted_axes([0,2,3,1]);

    if band == "20m" {
        let nc = nhwc.shape()[3];
        if nc <= OPTICAL_20M_CHANNELS[2] {
            return Err( shape_mismatch( band, format!("expected at least {} channels, got {nc}", OPTICAL_20M_CHANNELS[2]+1)))
        }
        Ok( nhwc.select( Axis(3), &OPTICAL_20M_CHANNELS) )
    } else {
        Ok( nhwc.to_owned() )
    }
}

fn normalize_optical (fields: &mut BTreeMap<String,ArrayD<u8>>, nrec: &mut NormalizedRecord)->Result<usize> {
    let subset = nrec.subset;
    let mut count = 0;

    for band in OPTICAL_BANDS {
        let a = take_field( fields, subset, band)?;
        let nhwc = optical_revisits( band, &a)?;
        let mode = optical_mode( band);

        let images = nhwc.axis_iter( Axis(0))
            .map( |hwc| decode( band, squeeze_channels( hwc), mode))
            .collect::<Result<Vec<DynamicImage>>>()?;
        count = set_images( nrec, band, images);
    }

    for field in OPTICAL_ANGLE_FIELDS {
        let v = nrec.metadata.remove(field).ok_or_else( || missing_field( subset, format!("{METADATA}.{field}")))?;
        nrec.metadata.insert( field.to_string(), parse_angle_list( field, v)?);
    }

    Ok(count)
}

/// parse the JSON string elements of an angle list. Already structured elements are kept as they are
fn parse_angle_list (field: &str, v: Value)->Result<Value> {
    match parse_nested( field, v)? {
        Value::Array(elems) => {
            let parsed = elems.into_iter().map( |e| parse_nested( field, e)).collect::<Result<Vec<Value>>>()?;
            Ok( Value::Array(parsed) )
        }
        other => Err( metadata_error( format!("{field} is a {}, not a list", json_type_name(&other))) )
    }
}

/* #endregion optical */

/* #region hyperspectral ***********************************************************************************/

/// mean over the band axis of a [B,H,W] slice, narrowed to u8
fn band_mean (field: &str, bands: ArrayView3<u8>)->Result<Array2<u8>> {
    bands.mapv( |v| v as f64)
        .mean_axis( Axis(0))
        .map( |mean| mean.mapv( narrow_u8))
        .ok_or_else( || shape_mismatch( field, "empty band group"))
}

/// pseudo RGB [H,W,3] of a [B,H,W] hyperspectral revisit, each channel the mean of a fixed band group
fn hyperspectral_composite (field: &str, bhw: ArrayView3<u8>)->Result<ndarray::Array3<u8>> {
    let nbands = bhw.shape()[0];
    let [b1, b2] = HYPERSPECTRAL_GROUP_BOUNDS;

    let r = band_mean( field, bhw.slice_axis( Axis(0), Slice::from(0..b1)))?;
    let g = band_mean( field, bhw.slice_axis( Axis(0), Slice::from(b1..b2)))?;
    let b = band_mean( field, bhw.slice_axis( Axis(0), Slice::from(b2..nbands)))?;

    Ok( stack( Axis(2), &[r.view(), g.view(), b.view()])? )
}

fn normalize_hyperspectral (fields: &mut BTreeMap<String,ArrayD<u8>>, nrec: &mut NormalizedRecord)->Result<usize> {
    let subset = nrec.subset;

    let rgb = take_field( fields, subset, "rgb")?;
    let count = set_images( nrec, "rgb", rgb_revisits( "rgb", &rgb)?);

    let chm = take_field( fields, subset, "chm")?;
    set_images( nrec, "chm", first_channel_revisits( "chm", &chm)?);

    let name = "1m";
    let m1 = take_field( fields, subset, name)?;
    let m1 = expect_rank::<Ix4>( name, m1.view(), "[N,B,H,W]")?;
    let nbands = m1.shape()[1];
    if nbands <= HYPERSPECTRAL_GROUP_BOUNDS[1] {
        return Err( shape_mismatch( name, format!("expected more than {} spectral bands, got {nbands}", HYPERSPECTRAL_GROUP_BOUNDS[1])))
    }
    let images = m1.axis_iter( Axis(0))
        .map( |bhw| {
            let composite = hyperspectral_composite( name, bhw)?;
            Ok( DynamicImage::ImageRgb8( rgb_image( name, composite.view())?) )
        })
        .collect::<Result<Vec<DynamicImage>>>()?;
    set_images( nrec, name, images);

    let bounds = nrec.metadata.remove("bounds").ok_or_else( || missing_field( subset, "metadata.bounds"))?;
    nrec.metadata.insert( "bounds".to_string(), swap_coordinate_pairs( bounds)?);
    nrec.metadata.insert( "epsg".to_string(), Value::from(EPSG_4326));

    Ok(count)
}

/// swap the elements of each consecutive pair in a flat coordinate list: [a,b,c,d] -> [b,a,d,c]
pub fn swap_coordinate_pairs (bounds: Value)->Result<Value> {
    match parse_nested( "bounds", bounds)? {
        Value::Array(mut coords) => {
            if coords.len() % 2 != 0 {
                return Err( metadata_error( format!("bounds has odd number of elements ({})", coords.len())))
            }
            for pair in coords.chunks_exact_mut(2) {
                pair.swap(0,1);
            }
            Ok( Value::Array(coords) )
        }
        other => Err( metadata_error( format!("bounds is a {}, not a list", json_type_name(&other))) )
    }
}

/* #endregion hyperspectral */

/// metadata values can be JSON encoded strings that need a second parse
fn parse_nested (field: &str, v: Value)->Result<Value> {
    match v {
        Value::String(s) => serde_json::from_str(&s).map_err( |e| metadata_error( format!("{field}: {e}"))),
        other => Ok(other)
    }
}
