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

/// array to image conversion primitives

use image::{DynamicImage,GrayImage,RgbImage};
use ndarray::{Array,ArrayView2,ArrayView3,ArrayViewD,Axis,Dimension,Ix2,Ix3};
use tracing::debug;

use crate::errors::{Result,shape_mismatch};

/// narrow a sample value to u8.
/// Values are truncated toward zero and saturate at the u8 bounds: 300.0 -> 255, -3.0 -> 0, 12.7 -> 12, NaN -> 0.
/// There is no rescaling, input values are supposed to already be in [0,255]
#[inline(always)]
pub fn narrow_u8 (x: f64)->u8 {
    x as u8
}

pub fn to_u8_array<D> (a: &Array<f64,D>)->Array<u8,D> where D: Dimension {
    a.mapv( narrow_u8)
}

/// the pixel layout of a decoded image
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum ImageMode {
    Luma,
    Rgb
}

fn image_dim (field: &str, len: usize)->Result<u32> {
    u32::try_from(len).map_err( |_| shape_mismatch( field, format!("image dimension {len} too large")))
}

/// single channel image from a [H,W] plane
pub fn gray_image (field: &str, plane: ArrayView2<u8>)->Result<GrayImage> {
    let (h,w) = plane.dim();
    let pixels: Vec<u8> = plane.iter().copied().collect();
    GrayImage::from_raw( image_dim(field,w)?, image_dim(field,h)?, pixels)
        .ok_or_else( || shape_mismatch( field, format!("cannot create {w}x{h} gray image")))
}

/// RGB image from a [H,W,3] array
pub fn rgb_image (field: &str, hwc: ArrayView3<u8>)->Result<RgbImage> {
    let (h,w,c) = hwc.dim();
    if c != 3 {
        return Err( shape_mismatch( field, format!("RGB image needs 3 channels, got {c}")))
    }
    let pixels: Vec<u8> = hwc.iter().copied().collect();
    RgbImage::from_raw( image_dim(field,w)?, image_dim(field,h)?, pixels)
        .ok_or_else( || shape_mismatch( field, format!("cannot create {w}x{h} RGB image")))
}

/// [C,H,W] -> [H,W,C]
pub fn chw_to_hwc<'a> (chw: ArrayView3<'a,u8>)->ArrayView3<'a,u8> {
    chw.permuted_axes([1,2,0])
}

/// drop the channel axis of a [H,W,C] view if it has length 1. Spatial axes are kept even if they are
/// singletons, a 1 pixel high tile is still a [1,W] image
pub fn squeeze_channels<'a> (hwc: ArrayView3<'a,u8>)->ArrayViewD<'a,u8> {
    if hwc.shape()[2] == 1 {
        hwc.index_axis_move( Axis(2), 0).into_dyn()
    } else {
        hwc.into_dyn()
    }
}

/// check that an array has the expected rank and return it as fixed dimension view.
/// `what` describes the expected layout in error messages (e.g. "[N,C,H,W]")
pub fn expect_rank<'a,D> (field: &str, a: ArrayViewD<'a,u8>, what: &str)->Result<ndarray::ArrayView<'a,u8,D>> where D: Dimension {
    let ndim = a.ndim();
    a.into_dimensionality::<D>()
        .map_err( |_| shape_mismatch( field, format!("expected {what} array, got rank {ndim}")))
}

/// decode a [H,W] or [H,W,C] view into an image of the given mode.
/// Luma decoding of a multi channel view uses its first channel
pub fn decode (field: &str, a: ArrayViewD<u8>, mode: ImageMode)->Result<DynamicImage> {
    match (mode, a.ndim()) {
        (ImageMode::Luma, 2) => {
            let plane = expect_rank::<Ix2>( field, a, "[H,W]")?;
            Ok( DynamicImage::ImageLuma8( gray_image( field, plane)?) )
        }
        (ImageMode::Luma, 3) => {
            debug!("field '{}' has {} channels, using first for single channel image", field, a.shape()[2]);
            let hwc = expect_rank::<Ix3>( field, a, "[H,W,C]")?;
            Ok( DynamicImage::ImageLuma8( gray_image( field, hwc.index_axis_move( Axis(2), 0))?) )
        }
        (ImageMode::Rgb, 3) => {
            let hwc = expect_rank::<Ix3>( field, a, "[H,W,3]")?;
            Ok( DynamicImage::ImageRgb8( rgb_image( field, hwc)?) )
        }
        (mode, ndim) => Err( shape_mismatch( field, format!("cannot decode rank {ndim} array as {mode:?} image")))
    }
}
