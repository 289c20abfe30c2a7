fn main() -> Result<(), eframe::Error> {
    matte_retouch::run_native()
}
