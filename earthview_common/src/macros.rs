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

/// `std::io::Error` of a given `ErrorKind` with a formatted message
#[macro_export]
macro_rules! io_error {
    ( $kind:expr, $fmt:literal $(, $($arg:expr),* )? ) => {
        std::io::Error::new( $kind, format!( $fmt $(, $($arg),* )?))
    }
}

/* #region define_cli  ****************************************************************************************/

/// command line options of a tool as a lazily parsed static. Each field spec lists the clap `#[arg(..)]`
/// options in brackets, the header the `#[command(..)]` options:
/// ```ignore
/// define_cli! { ARGS [about="export subset images"] =
///     max: Option<usize>   [help="max number of records", long, short],
///     output_dir: String   [help="image directory", long, default_value="images"],
///     subset: String       [help="subset name"]
/// }
///
/// fn main()->anyhow::Result<()> {
///     check_cli!(ARGS); // parse (and exit on --help or errors) before anything else happens
///     let dir = &ARGS.output_dir;
///     ..
/// }
/// ```
#[macro_export]
macro_rules! define_cli {
    ($name:ident [ $( $copt:ident $(= $cx:expr)? ),* ] = $( $( #[$meta:meta] )? $field:ident : $ftype:ty [ $( $aopt:ident $(= $ax:expr)?),* ] ),* ) => {
        use clap::Parser;
        use lazy_static::lazy_static;

        #[derive(Parser)]
        #[command( $( $copt $(= $cx)? ),* )]
        struct CliOpts {
            $(
                #[arg( $( $aopt $(= $ax)? ),* )]
                $( #[$meta] )?
                $field: $ftype,
            )*
        }

        lazy_static! { static ref $name: CliOpts = CliOpts::parse(); }
    }
}

/// force command line parsing of a `define_cli!` static
#[macro_export]
macro_rules! check_cli {
    ($cli:ident) => { lazy_static::initialize( &$cli); }
}

/* #endregion define_cli */

/// thiserror based error enum, one `Variant(fields..) : "message"` entry per variant:
/// ```ignore
/// define_error!{ pub EarthViewError =
///     UnknownSubset(String) : "unknown subset: {0}",
///     ImageError(#[from] image::ImageError) : "image error: {0}"
/// }
/// ```
/// Field attributes such as `#[from]` or `#[source]` are passed through to thiserror
#[macro_export]
macro_rules! define_error {
    ($vis:vis $name:ident = $( $variant:ident ( $( $( #[$meta:meta] )? $ftype:ty ),* ) : $msg:literal ),*) => {
        use thiserror;

        #[derive(thiserror::Error,Debug)]
        $vis enum $name {
            $(
                #[error($msg)]
                $variant ( $( $( #[$meta] )? $ftype ),* )
            ),*
        }
    }
}
