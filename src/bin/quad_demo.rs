use std::process;
use std::rc::Rc;

use log::{error, info};

use igloo::graphics;
use igloo::{
    init_logging, Framebuffer, Igloo, IndexBuffer, LoggingConfig, PrimitiveMode, Program,
    ShaderLibrary, Texture, TextureOptions, VertexArray, VertexBuffer,
};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 64;

#[rustfmt::skip]
const QUAD_VERTICES: [f32; 12] = [
    -1.0, -1.0, 0.0,
     1.0, -1.0, 0.0,
    -1.0,  1.0, 0.0,
     1.0,  1.0, 0.0,
];
const QUAD_INDICES: [u8; 6] = [0, 1, 2, 1, 2, 3];

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}

fn run() -> igloo::Result<()> {
    let igloo = Igloo::new()?;
    let ctx = igloo.context();

    let library = ShaderLibrary::from_env();
    let mut program = Program::load(&ctx, &library, "passthrough_vertex", "passthrough_fragment")?;

    let vertex_array = VertexArray::new(&ctx)
        .with_vertex_buffer(VertexBuffer::with_data(&ctx, &QUAD_VERTICES, None, None))
        .with_index_buffer(IndexBuffer::with_data(&ctx, &QUAD_INDICES, None))
        .with_attribute("position", 3)
        .finish(&mut program);
    program.attach_vertex_array(Rc::new(vertex_array));

    let mut target = Texture::new(&ctx, TextureOptions::default());
    target.blank(WIDTH, HEIGHT);

    let mut framebuffer = Framebuffer::new(&ctx);
    framebuffer.attach(&target).attach_depth(WIDTH, HEIGHT);
    framebuffer.status()?;

    graphics::viewport(&*ctx, 0, 0, WIDTH, HEIGHT);
    graphics::clear(&*ctx, Some([0.0, 0.0, 0.0, 1.0]), true);
    program.draw_elements(PrimitiveMode::Triangles, QUAD_INDICES.len());
    framebuffer.unbind();

    let pixels = target.read_back();
    graphics::log_errors(&*ctx);

    let center = ((HEIGHT / 2 * WIDTH + WIDTH / 2) * 4) as usize;
    info!(
        "Read back {} bytes from a {}x{} target, center pixel is {:?}",
        pixels.len(), WIDTH, HEIGHT, &pixels[center..center + 4],
    );

    Ok(())
}
