use gridflight_web_lib::{run, window_conf};

#[macroquad::main(window_conf)]
async fn main() {
    run().await;
}
