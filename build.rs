use std::path::Path;

const SHADER_DIR: &str = "src/graphics/shaders/wgsl";

// Parse and validate every WGSL shader at build time so a bad shader is a
// compile error rather than a panic at pipeline creation.
fn main() {
    println!("cargo:rerun-if-changed={}", SHADER_DIR);

    for entry in std::fs::read_dir(SHADER_DIR).expect("Shaders directory should exist") {
        let entry = entry.unwrap();
        let path = entry.path();

        if let Some(extension) = path.extension().and_then(|os_str| os_str.to_str()) {
            if extension.eq_ignore_ascii_case("wgsl") {
                println!("cargo:rerun-if-changed={}", path.to_string_lossy());
                validate_shader(&path);
            }
        }
    }
}

fn validate_shader(path: &Path) {
    let shader_source = std::fs::read_to_string(path).expect("Shader source should be available");

    let module = naga::front::wgsl::parse_str(&shader_source)
        .unwrap_or_else(|e| panic!("{}: {:#?}", path.display(), e));

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .unwrap_or_else(|e| panic!("{}: {:#?}", path.display(), e));
}
