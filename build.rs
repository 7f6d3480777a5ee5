fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=proto/ukmec.proto");
    println!("cargo:rerun-if-changed=data/ukmec_2016.json");

    // Protobuf bindings are only needed by the gRPC transport.
    if std::env::var_os("CARGO_FEATURE_TRANSPORT_GRPC").is_none() {
        return Ok(());
    }

    // Vendored protoc keeps `--features server` builds reproducible.
    let protoc_path = protoc_bin_vendored::protoc_bin_path()
        .map_err(|e| format!("failed to locate vendored protoc: {e}"))?;
    std::env::set_var("PROTOC", protoc_path);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/ukmec.proto"], &["proto/"])?;
    Ok(())
}
