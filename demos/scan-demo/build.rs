//! 构建期扫描：按 `scan.toml` 生成 `register_services`

fn main() -> Result<(), di_codegen::ScanError> {
    di_codegen::Generator::from_env()?
        .plan_file("scan.toml")?
        .write_to_out_dir("registrations.rs")?;
    Ok(())
}
