fn main() {
    slint_build::compile("ui/minimal.slint").unwrap();
}
