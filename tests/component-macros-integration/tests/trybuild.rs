//! trybuild 编译测试：宏展开结果可以在独立 crate 中编译

#[test]
fn trybuild_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/injectable_ok.rs");
    t.pass("tests/trybuild/derive_ok.rs");
}
