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
#![allow(unused)]

use ndarray::{ArrayD,Dimension,IxDyn};
use serde_json::{json,Value};
use earthview::{
    EarthViewError, Field, Metadata, Record, SubsetId, normalize, normalize_by_name,
    normalizer::{radar_ratio,swap_coordinate_pairs}
};

// run with  cargo test --test test_normalize -- --nocapture

fn parsed (v: Value)->Metadata {
    match v {
        Value::Object(map) => Metadata::Parsed(map),
        _ => panic!("not an object")
    }
}

fn array (shape: &[usize], f: impl Fn(&[usize])->f64)->ArrayD<f64> {
    ArrayD::from_shape_fn( IxDyn(shape), |idx| f( idx.slice()))
}

fn zeros (shape: &[usize])->ArrayD<f64> {
    ArrayD::zeros( IxDyn(shape))
}

fn aerial_record (n: usize)->Record {
    Record::new()
        .with_metadata( parsed( json!({"id": 42})))
        // channel c of pixel (x,y) has value 10*c + 2*y + x
        .with_field( "rgb", array( &[n,3,2,2], |i| (10*i[1] + 2*i[2] + i[3]) as f64))
        // first channel holds distinct values, the others are filler
        .with_field( "1m", array( &[n,4,2,2], |i| if i[1] == 0 { (10 + 10*(2*i[2] + i[3])) as f64 } else { 99.0 }))
}

/* #region aerial */

#[test]
fn test_aerial_black_rgb () {
    println!("\n--- test_aerial_black_rgb");
    let rec = Record::new()
        .with_metadata( parsed( json!({})))
        .with_field( "rgb", zeros( &[1,3,2,2]))
        .with_field( "1m", zeros( &[1,1,2,2]));

    let nrec = normalize( SubsetId::Aerial, rec).unwrap();
    let images = nrec.images("rgb").unwrap();
    assert_eq!( images.len(), 1);

    let img = images[0].as_rgb8().unwrap();
    assert_eq!( img.dimensions(), (2,2));
    assert!( img.pixels().all( |p| p.0 == [0,0,0]));
}

#[test]
fn test_aerial_channel_order () {
    println!("\n--- test_aerial_channel_order");
    let nrec = normalize( SubsetId::Aerial, aerial_record(1)).unwrap();

    let rgb = nrec.images("rgb").unwrap()[0].as_rgb8().unwrap();
    assert_eq!( rgb.get_pixel(0,0).0, [0,10,20]);
    assert_eq!( rgb.get_pixel(1,0).0, [1,11,21]);
    assert_eq!( rgb.get_pixel(0,1).0, [2,12,22]);
    assert_eq!( rgb.get_pixel(1,1).0, [3,13,23]);

    let m1 = nrec.images("1m").unwrap()[0].as_luma8().unwrap();
    let values: Vec<u8> = m1.pixels().map( |p| p.0[0]).collect();
    println!("1m values: {values:?}");
    assert_eq!( values, vec![10,20,30,40]);
}

#[test]
fn test_aerial_count () {
    println!("\n--- test_aerial_count");
    for n in 1..=4 {
        let nrec = normalize( SubsetId::Aerial, aerial_record(n)).unwrap();
        assert_eq!( nrec.count(), Some(n as u64));
        assert_eq!( nrec.images("rgb").unwrap().len(), n);
        assert_eq!( nrec.images("1m").unwrap().len(), n);
    }
}

#[test]
fn test_aerial_missing_field () {
    println!("\n--- test_aerial_missing_field");
    let rec = Record::new()
        .with_metadata( parsed( json!({})))
        .with_field( "rgb", zeros( &[1,3,2,2]));

    match normalize( SubsetId::Aerial, rec) {
        Err(EarthViewError::MissingField(subset,field)) => {
            assert_eq!( subset, "satellogic");
            assert_eq!( field, "1m");
        }
        other => panic!("expected missing field error, got {other:?}")
    }
}

#[test]
fn test_missing_metadata () {
    let rec = Record::new()
        .with_field( "rgb", zeros( &[1,3,2,2]))
        .with_field( "1m", zeros( &[1,1,2,2]));

    match normalize( SubsetId::Aerial, rec) {
        Err(EarthViewError::MissingField(_,field)) => assert_eq!( field, "metadata"),
        other => panic!("expected missing field error, got {other:?}")
    }
}

#[test]
fn test_aerial_wrong_rank () {
    let rec = Record::new()
        .with_metadata( parsed( json!({})))
        .with_field( "rgb", zeros( &[3,2,2]))
        .with_field( "1m", zeros( &[1,1,2,2]));

    let res = normalize( SubsetId::Aerial, rec);
    assert!( matches!( res, Err(EarthViewError::ShapeMismatch(ref field,_)) if field == "rgb"));
}

#[test]
fn test_aerial_rgb_needs_three_channels () {
    let rec = Record::new()
        .with_metadata( parsed( json!({})))
        .with_field( "rgb", zeros( &[1,4,2,2]))
        .with_field( "1m", zeros( &[1,1,2,2]));

    assert!( matches!( normalize( SubsetId::Aerial, rec), Err(EarthViewError::ShapeMismatch(..))));
}

#[test]
fn test_unconverted_fields_are_narrowed () {
    println!("\n--- test_unconverted_fields_are_narrowed");
    let rec = aerial_record(1)
        .with_field( "mask", array( &[1,2,2], |i| if i[1] == 0 { 300.0 } else { -4.0 }));

    let nrec = normalize( SubsetId::Aerial, rec).unwrap();
    let mask = nrec.array("mask").unwrap();
    assert_eq!( mask.shape(), &[1,2,2]);
    assert_eq!( mask.iter().copied().collect::<Vec<u8>>(), vec![255,255,0,0]);
}

/* #endregion aerial */

/* #region metadata */

#[test]
fn test_raw_metadata () {
    println!("\n--- test_raw_metadata");
    let raw = r#"{"id": 42, "epsg": "EPSG:32611"}"#;
    let rec = Record::new()
        .with_metadata( Metadata::Raw(raw.to_string()))
        .with_field( "rgb", zeros( &[2,3,2,2]))
        .with_field( "1m", zeros( &[2,1,2,2]));

    let nrec = normalize( SubsetId::Aerial, rec).unwrap();
    assert_eq!( nrec.metadata.get("id"), Some(&json!(42)));
    assert_eq!( nrec.metadata.get("epsg"), Some(&json!("EPSG:32611")));
    assert_eq!( nrec.metadata.get("count"), Some(&json!(2)));
}

#[test]
fn test_raw_and_parsed_metadata_agree () {
    let raw = r#"{"id": 42, "tags": ["a","b"]}"#;
    let rec_raw = aerial_record(1).with_metadata( Metadata::Raw(raw.to_string()));
    let rec_parsed = aerial_record(1).with_metadata( parsed( json!({"id": 42, "tags": ["a","b"]})));

    let m1 = normalize( SubsetId::Aerial, rec_raw).unwrap().metadata;
    let m2 = normalize( SubsetId::Aerial, rec_parsed).unwrap().metadata;
    assert_eq!( m1, m2);
}

#[test]
fn test_invalid_metadata () {
    let rec = aerial_record(1).with_metadata( Metadata::Raw("{not json".to_string()));
    match normalize( SubsetId::Aerial, rec) {
        Err(EarthViewError::MetadataError(msg)) => assert!( msg.starts_with("metadata:"), "{msg}"),
        other => panic!("expected metadata error, got {other:?}")
    }

    let rec = aerial_record(1).with_metadata( Metadata::Raw("[1,2]".to_string()));
    assert!( matches!( normalize( SubsetId::Aerial, rec), Err(EarthViewError::MetadataError(_))));
}

#[test]
fn test_unknown_subset () {
    println!("\n--- test_unknown_subset");
    match normalize_by_name( "landsat", aerial_record(1)) {
        Err(EarthViewError::UnknownSubset(name)) => assert_eq!( name, "landsat"),
        other => panic!("expected unknown subset error, got {other:?}")
    }

    let nrec = normalize_by_name( "satellogic", aerial_record(1)).unwrap();
    assert_eq!( nrec.subset, SubsetId::Aerial);
}

/* #endregion metadata */

/* #region radar */

fn radar_record (n: usize, v: &[f64], h: &[f64])->Record {
    let w = v.len();
    Record::new()
        .with_metadata( parsed( json!({})))
        .with_field( "10m", array( &[n,2,1,w], |i| if i[1] == 0 { v[i[3]] } else { h[i[3]] }))
}

#[test]
fn test_radar_ratio () {
    println!("\n--- test_radar_ratio");
    assert_eq!( radar_ratio( 100, 0), 255); // saturates, does not wrap around
    assert_eq!( radar_ratio( 10, 20), 127); // 10 / 20.01 * 256 = 127.93
    assert_eq!( radar_ratio( 0, 0), 0);
    assert_eq!( radar_ratio( 1, 255), 1);   // 1 / 255.01 * 256 = 1.0039
}

#[test]
fn test_radar_composite () {
    println!("\n--- test_radar_composite");
    let nrec = normalize( SubsetId::Radar, radar_record( 1, &[100.0, 10.0], &[0.0, 20.0])).unwrap();

    let images = nrec.images("10m").unwrap();
    assert_eq!( images.len(), 1);
    let img = images[0].as_rgb8().unwrap();
    assert_eq!( img.dimensions(), (2,1));
    assert_eq!( img.get_pixel(0,0).0, [100,0,255]);
    assert_eq!( img.get_pixel(1,0).0, [10,20,127]);
    assert_eq!( nrec.count(), Some(1));
}

#[test]
fn test_radar_ratio_uses_narrowed_values () {
    // 300 is narrowed to 255 and -5 to 0 before the ratio channel is computed
    let nrec = normalize( SubsetId::Radar, radar_record( 1, &[300.0], &[-5.0])).unwrap();
    let img = nrec.images("10m").unwrap()[0].as_rgb8().unwrap();
    assert_eq!( img.get_pixel(0,0).0, [255,0,255]);
}

#[test]
fn test_radar_count () {
    for n in 1..=3 {
        let nrec = normalize( SubsetId::Radar, radar_record( n, &[1.0,2.0], &[3.0,4.0])).unwrap();
        assert_eq!( nrec.count(), Some(n as u64));
    }
}

#[test]
fn test_radar_needs_two_channels () {
    let rec = Record::new()
        .with_metadata( parsed( json!({})))
        .with_field( "10m", zeros( &[1,3,2,2]));
    assert!( matches!( normalize( SubsetId::Radar, rec), Err(EarthViewError::ShapeMismatch(..))));
}

/* #endregion radar */

/* #region optical */

const H: usize = 2;
const W: usize = 3;

fn optical_metadata ()->Value {
    json!({
        "solarAngles": [ r#"{"azimuth": 150.5, "zenith": 30.25}"# ],
        "tileGeometry": [ r#"[[1,2],[3,4]]"# ],
        "viewIncidenceAngles": [ r#"{"B02": {"azimuth": 10.5}}"# ],
        "id": "T11SMT"
    })
}

fn optical_record (n: usize, n10m: usize)->Record {
    Record::new()
        .with_metadata( parsed( optical_metadata()))
        .with_field( "10m", array( &[n,n10m,H,W], |i| (i[1]*50 + i[3]) as f64))
        .with_field( "20m", array( &[n,5,H,W], |i| (i[1]*10) as f64))
        .with_field( "rgb", array( &[n,3,H,W], |i| (i[1]*100 + i[2]) as f64))
        .with_field( "scl", array( &[n,1,H,W], |i| (i[2]*W + i[3]) as f64))
}

#[test]
fn test_optical_bands () {
    println!("\n--- test_optical_bands");
    let nrec = normalize( SubsetId::Optical, optical_record( 1, 1)).unwrap();

    let b10m = nrec.images("10m").unwrap()[0].as_luma8().unwrap();
    assert_eq!( b10m.dimensions(), (W as u32, H as u32));
    assert_eq!( b10m.get_pixel(2,1).0, [2]);

    let rgb = nrec.images("rgb").unwrap()[0].as_rgb8().unwrap();
    assert_eq!( rgb.get_pixel(0,1).0, [1,101,201]);

    let scl = nrec.images("scl").unwrap()[0].as_luma8().unwrap();
    let values: Vec<u8> = scl.pixels().map( |p| p.0[0]).collect();
    assert_eq!( values, vec![0,1,2,3,4,5]);
}

#[test]
fn test_optical_20m_channel_selection () {
    println!("\n--- test_optical_20m_channel_selection");
    let nrec = normalize( SubsetId::Optical, optical_record( 1, 1)).unwrap();

    let b20m = nrec.images("20m").unwrap()[0].as_rgb8().unwrap();
    assert_eq!( b20m.dimensions(), (W as u32, H as u32));
    assert!( b20m.pixels().all( |p| p.0 == [0,20,40]));
}

#[test]
fn test_optical_20m_too_few_channels () {
    let rec = optical_record( 1, 1).with_field( "20m", zeros( &[1,4,H,W]));
    assert!( matches!( normalize( SubsetId::Optical, rec), Err(EarthViewError::ShapeMismatch(ref f,_)) if f == "20m"));
}

#[test]
fn test_optical_multichannel_10m_uses_first_channel () {
    let nrec = normalize( SubsetId::Optical, optical_record( 1, 4)).unwrap();
    let b10m = nrec.images("10m").unwrap()[0].as_luma8().unwrap();
    let values: Vec<u8> = b10m.pixels().map( |p| p.0[0]).collect();
    assert_eq!( values, vec![0,1,2,0,1,2]);
}

#[test]
fn test_optical_angles () {
    println!("\n--- test_optical_angles");
    let nrec = normalize( SubsetId::Optical, optical_record( 1, 1)).unwrap();
    let md = &nrec.metadata;

    assert_eq!( md.get("solarAngles"), Some(&json!([{"azimuth": 150.5, "zenith": 30.25}])));
    assert_eq!( md.get("tileGeometry"), Some(&json!([[[1,2],[3,4]]])));
    assert_eq!( md.get("viewIncidenceAngles"), Some(&json!([{"B02": {"azimuth": 10.5}}])));
    assert_eq!( md.get("id"), Some(&json!("T11SMT")));
}

#[test]
fn test_optical_angles_idempotent () {
    let first = normalize( SubsetId::Optical, optical_record( 1, 1)).unwrap();
    let rec = optical_record( 1, 1).with_metadata( Metadata::Parsed( first.metadata.clone()));
    let second = normalize( SubsetId::Optical, rec).unwrap();

    assert_eq!( first.metadata, second.metadata);
}

#[test]
fn test_optical_missing_angles () {
    let rec = optical_record( 1, 1).with_metadata( parsed( json!({"solarAngles": []})));
    match normalize( SubsetId::Optical, rec) {
        Err(EarthViewError::MissingField(subset,field)) => {
            assert_eq!( subset, "sentinel_2");
            assert_eq!( field, "metadata.tileGeometry");
        }
        other => panic!("expected missing field error, got {other:?}")
    }
}

#[test]
fn test_optical_invalid_angle_element () {
    let mut md = optical_metadata();
    md["solarAngles"] = json!([ "{bad" ]);
    let rec = optical_record( 1, 1).with_metadata( parsed( md));

    match normalize( SubsetId::Optical, rec) {
        Err(e @ EarthViewError::MetadataError(_)) => {
            println!("  {e}");
            assert!( e.to_string().contains("solarAngles"));
        }
        other => panic!("expected metadata error, got {other:?}")
    }
}

#[test]
fn test_optical_single_row_tile () {
    println!("\n--- test_optical_single_row_tile");
    let rec = Record::new()
        .with_metadata( parsed( optical_metadata()))
        .with_field( "10m", array( &[1,1,1,4], |i| (i[3] * 10) as f64))
        .with_field( "20m", zeros( &[1,5,1,4]))
        .with_field( "rgb", zeros( &[1,3,1,4]))
        .with_field( "scl", array( &[1,1,1,4], |i| i[3] as f64));
    let nrec = normalize( SubsetId::Optical, rec).unwrap();

    let b10m = nrec.images("10m").unwrap()[0].as_luma8().unwrap();
    assert_eq!( b10m.dimensions(), (4,1));
    assert_eq!( b10m.pixels().map( |p| p.0[0]).collect::<Vec<u8>>(), vec![0,10,20,30]);

    assert_eq!( nrec.images("rgb").unwrap()[0].as_rgb8().unwrap().dimensions(), (4,1));
    assert_eq!( nrec.images("scl").unwrap()[0].as_luma8().unwrap().dimensions(), (4,1));
}

#[test]
fn test_optical_count () {
    for n in 1..=3 {
        let nrec = normalize( SubsetId::Optical, optical_record( n, 1)).unwrap();
        assert_eq!( nrec.count(), Some(n as u64));
        for band in ["10m", "20m", "rgb", "scl"] {
            assert_eq!( nrec.images(band).unwrap().len(), n);
        }
    }
}

/* #endregion optical */

/* #region hyperspectral */

const NBANDS: usize = 250;

/// band values: 10 for the first group, 20 for the second, 1,2,2 for the remaining three bands
fn band_value (b: usize)->f64 {
    match b {
        0..124 => 10.0,
        124..247 => 20.0,
        247 => 1.0,
        _ => 2.0
    }
}

fn hyperspectral_record (n: usize, metadata: Value)->Record {
    Record::new()
        .with_metadata( parsed( metadata))
        .with_field( "rgb", array( &[n,3,1,2], |i| (i[1]*10 + i[3]) as f64))
        .with_field( "chm", array( &[n,2,1,2], |i| if i[1] == 0 { (5 + i[3]) as f64 } else { 77.0 }))
        .with_field( "1m", array( &[n,NBANDS,1,2], |i| band_value(i[1])))
}

#[test]
fn test_hyperspectral_images () {
    println!("\n--- test_hyperspectral_images");
    let nrec = normalize( SubsetId::Hyperspectral, hyperspectral_record( 1, json!({"bounds": [1.0,2.0,3.0,4.0]}))).unwrap();

    let rgb = nrec.images("rgb").unwrap()[0].as_rgb8().unwrap();
    assert_eq!( rgb.get_pixel(1,0).0, [1,11,21]);

    let chm = nrec.images("chm").unwrap()[0].as_luma8().unwrap();
    assert_eq!( chm.get_pixel(0,0).0, [5]);
    assert_eq!( chm.get_pixel(1,0).0, [6]);

    // third group mean is 5/3, truncated to 1
    let m1 = nrec.images("1m").unwrap()[0].as_rgb8().unwrap();
    assert_eq!( m1.dimensions(), (2,1));
    assert!( m1.pixels().all( |p| p.0 == [10,20,1]));
}

#[test]
fn test_hyperspectral_metadata () {
    println!("\n--- test_hyperspectral_metadata");
    let md = json!({"bounds": [1.0,2.0,3.0,4.0], "epsg": "EPSG:32611", "site": "SJER"});
    let nrec = normalize( SubsetId::Hyperspectral, hyperspectral_record( 1, md)).unwrap();

    assert_eq!( nrec.metadata.get("bounds"), Some(&json!([2.0,1.0,4.0,3.0])));
    assert_eq!( nrec.metadata.get("epsg"), Some(&json!("EPSG:4326")));
    assert_eq!( nrec.metadata.get("site"), Some(&json!("SJER")));

    // epsg is set even if there was none
    let nrec = normalize( SubsetId::Hyperspectral, hyperspectral_record( 1, json!({"bounds": []}))).unwrap();
    assert_eq!( nrec.metadata.get("epsg"), Some(&json!("EPSG:4326")));
}

#[test]
fn test_hyperspectral_serialized_bounds () {
    let nrec = normalize( SubsetId::Hyperspectral, hyperspectral_record( 1, json!({"bounds": "[1,2,3,4,5,6]"}))).unwrap();
    assert_eq!( nrec.metadata.get("bounds"), Some(&json!([2,1,4,3,6,5])));
}

#[test]
fn test_swap_coordinate_pairs () {
    assert_eq!( swap_coordinate_pairs( json!(["a","b","c","d"])).unwrap(), json!(["b","a","d","c"]));
    assert_eq!( swap_coordinate_pairs( json!([])).unwrap(), json!([]));
    assert!( matches!( swap_coordinate_pairs( json!([1,2,3])), Err(EarthViewError::MetadataError(_))));
    assert!( matches!( swap_coordinate_pairs( json!({"a": 1})), Err(EarthViewError::MetadataError(_))));
}

#[test]
fn test_hyperspectral_missing_bounds () {
    let res = normalize( SubsetId::Hyperspectral, hyperspectral_record( 1, json!({})));
    assert!( matches!( res, Err(EarthViewError::MissingField(_, ref f)) if f == "metadata.bounds"));
}

#[test]
fn test_hyperspectral_too_few_bands () {
    let rec = hyperspectral_record( 1, json!({"bounds": []})).with_field( "1m", zeros( &[1,247,1,2]));
    assert!( matches!( normalize( SubsetId::Hyperspectral, rec), Err(EarthViewError::ShapeMismatch(ref f,_)) if f == "1m"));
}

#[test]
fn test_hyperspectral_count () {
    for n in 1..=3 {
        let nrec = normalize( SubsetId::Hyperspectral, hyperspectral_record( n, json!({"bounds": [0,1]}))).unwrap();
        assert_eq!( nrec.count(), Some(n as u64));
        assert_eq!( nrec.images("1m").unwrap().len(), n);
    }
}

/* #endregion hyperspectral */

#[test]
fn test_all_subsets_produce_structured_metadata () {
    let records = [
        (SubsetId::Aerial, aerial_record(2)),
        (SubsetId::Radar, radar_record( 2, &[1.0], &[1.0])),
        (SubsetId::Optical, optical_record( 2, 1)),
        (SubsetId::Hyperspectral, hyperspectral_record( 2, json!({"bounds": [0,1]}))),
    ];

    for (subset, rec) in records {
        let nrec = normalize( subset, rec).unwrap();
        println!("{subset}: {:?}", nrec.fields.keys().collect::<Vec<_>>());
        assert_eq!( nrec.count(), Some(2));
        for field in subset.image_fields() {
            assert!( matches!( nrec.fields.get(*field), Some(Field::Images(_))));
        }
    }
}
