pub fn list() {
    for name in super::factory().names() {
        println!("{name}");
    }
}
