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

/// the EarthView subsets and their static shard layout

use std::{collections::BTreeMap, fmt, str::FromStr};
use serde::{Serialize,Deserialize};
use strum::{EnumIter,IntoEnumIterator};
use rand::Rng;

use crate::errors::{Result,EarthViewError,illegal_argument};

/// the sensor collections of the dataset. Serialized (and parsed) under their dataset names
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,EnumIter,Serialize,Deserialize)]
pub enum SubsetId {
    /// aerial RGB imagery ("satellogic")
    #[serde(rename="satellogic")]
    Aerial,

    /// synthetic aperture radar, V+H polarization ("sentinel_1")
    #[serde(rename="sentinel_1")]
    Radar,

    /// multispectral satellite imagery ("sentinel_2")
    #[serde(rename="sentinel_2")]
    Optical,

    /// airborne hyperspectral imagery with canopy height model ("neon")
    #[serde(rename="neon")]
    Hyperspectral,
}

impl SubsetId {
    pub fn name (&self)->&'static str {
        match self {
            SubsetId::Aerial => "satellogic",
            SubsetId::Radar => "sentinel_1",
            SubsetId::Optical => "sentinel_2",
            SubsetId::Hyperspectral => "neon",
        }
    }

    pub fn all ()->Vec<SubsetId> {
        SubsetId::iter().collect()
    }

    /// the raster field whose revisit count goes into `metadata.count`
    pub fn primary_field (&self)->&'static str {
        match self {
            SubsetId::Aerial => "1m",
            SubsetId::Radar => "10m",
            SubsetId::Optical => "scl",
            SubsetId::Hyperspectral => "rgb",
        }
    }

    /// the raster fields that get converted into images
    pub fn image_fields (&self)->&'static [&'static str] {
        match self {
            SubsetId::Aerial => &["rgb", "1m"],
            SubsetId::Radar => &["10m"],
            SubsetId::Optical => &["10m", "20m", "rgb", "scl"],
            SubsetId::Hyperspectral => &["rgb", "chm", "1m"],
        }
    }

    pub fn is_subset_name (s: &str)->bool {
        SubsetId::iter().any( |id| id.name() == s)
    }
}

impl FromStr for SubsetId {
    type Err = EarthViewError;

    fn from_str (s: &str)->Result<Self> {
        SubsetId::iter()
            .find( |id| id.name() == s)
            .ok_or_else( || EarthViewError::UnknownSubset( s.to_string()))
    }
}

impl fmt::Display for SubsetId {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!( f, "{}", self.name())
    }
}

/// static per-subset storage configuration. `path` and `config` default to the subset name
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SubsetDescriptor {
    pub shards: u32,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub config: Option<String>,
}

impl SubsetDescriptor {
    pub fn new (shards: u32)->Self {
        SubsetDescriptor { shards, path: None, config: None }
    }

    pub fn with_path (mut self, path: impl ToString)->Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_config (mut self, config: impl ToString)->Self {
        self.config = Some(config.to_string());
        self
    }
}

/// shard files of the optical subset are grouped in directories of this many files
const OPTICAL_GROUP_SIZE: u32 = 10;

/// lookup table from subset to its descriptor
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(transparent)]
pub struct SubsetTable {
    subsets: BTreeMap<SubsetId,SubsetDescriptor>
}

impl Default for SubsetTable {
    fn default()->Self {
        let mut subsets = BTreeMap::new();
        subsets.insert( SubsetId::Aerial, SubsetDescriptor::new(7863));
        subsets.insert( SubsetId::Radar, SubsetDescriptor::new(1763));
        subsets.insert( SubsetId::Hyperspectral, SubsetDescriptor::new(607).with_path("data").with_config("default"));
        subsets.insert( SubsetId::Optical, SubsetDescriptor::new(19997));
        SubsetTable { subsets }
    }
}

impl SubsetTable {
    pub fn new (subsets: BTreeMap<SubsetId,SubsetDescriptor>)->Self {
        SubsetTable { subsets }
    }

    pub fn subsets (&self)->impl Iterator<Item=SubsetId> + '_ {
        self.subsets.keys().copied()
    }

    pub fn descriptor (&self, subset: SubsetId)->Result<&SubsetDescriptor> {
        self.subsets.get( &subset).ok_or_else( || EarthViewError::UnknownSubset( subset.name().to_string()))
    }

    pub fn descriptor_by_name (&self, name: &str)->Result<&SubsetDescriptor> {
        self.descriptor( SubsetId::from_str(name)?)
    }

    pub fn nshards (&self, subset: SubsetId)->Result<u32> {
        Ok( self.descriptor(subset)?.shards )
    }

    pub fn path (&self, subset: SubsetId)->Result<String> {
        let desc = self.descriptor(subset)?;
        Ok( desc.path.clone().unwrap_or_else( || subset.name().to_string()) )
    }

    pub fn config (&self, subset: SubsetId)->Result<String> {
        let desc = self.descriptor(subset)?;
        Ok( desc.config.clone().unwrap_or_else( || subset.name().to_string()) )
    }

    /// repository relative path of a shard file.
    /// The optical subset uses a two level layout with `OPTICAL_GROUP_SIZE` files per directory
    pub fn shard_file (&self, subset: SubsetId, split: &str, shard: u32)->Result<String> {
        let nshards = self.nshards(subset)?;
        if shard >= nshards {
            return Err( illegal_argument( format!("shard {shard} out of range for {subset} ({nshards} shards)")))
        }
        let path = self.path(subset)?;

        let file = match subset {
            SubsetId::Optical => {
                let group = shard / OPTICAL_GROUP_SIZE;
                let idx = shard % OPTICAL_GROUP_SIZE;
                format!("{path}/{}-{group}/{split}-{idx:05}-of-{OPTICAL_GROUP_SIZE:05}.parquet", subset.name())
            }
            _ => format!("{path}/{split}-{shard:05}-of-{nshards:05}.parquet")
        };
        Ok(file)
    }

    pub fn shard_files (&self, subset: SubsetId, split: &str, shards: &[u32])->Result<Vec<String>> {
        shards.iter().map( |shard| self.shard_file( subset, split, *shard)).collect()
    }

    /// pick `n` distinct random shard indices of a subset (clamped to the number of shards)
    pub fn sample_shards<R> (&self, subset: SubsetId, n: usize, rng: &mut R)->Result<Vec<u32>> where R: Rng + ?Sized {
        let nshards = self.nshards(subset)? as usize;
        let amount = n.min(nshards);
        Ok( rand::seq::index::sample( rng, nshards, amount).into_iter().map( |i| i as u32).collect() )
    }
}
