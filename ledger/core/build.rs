// Copyright (c) 2026 Explore Service Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Build Script for explore-core
//!
//! Compiles `../../proto/explore_service.proto` into tonic server and client
//! stubs. The generated code lands in `OUT_DIR` and is included via
//! `tonic::include_proto!` in `src/presentation/grpc/server.rs`.
//!
//! `protoc` is vendored through `protoc-bin-vendored` so builds do not depend
//! on a system installation.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../../proto/explore_service.proto"], &["../../proto"])?;

    println!("cargo:rerun-if-changed=../../proto/explore_service.proto");

    Ok(())
}
