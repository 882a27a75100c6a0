mod common;

use common::{context, Call, PASSTHROUGH_FRAGMENT, PASSTHROUGH_VERTEX};
use igloo::vertex_array::AttributeLayout;
use igloo::{BufferTarget, IndexBuffer, Program, VertexArray, VertexBuffer};

fn is_attribute_setup(call: &Call) -> bool {
    match *call {
        Call::EnableVertexAttribArray(..) | Call::VertexAttribPointer { .. } => true,
        _ => false,
    }
}

#[test]
fn attributes_are_packed_in_declaration_order() {
    let (driver, ctx) = context();
    driver.set_location("position", 0);
    driver.set_location("uv", 1);

    let mut program = Program::new(&ctx, PASSTHROUGH_VERTEX, PASSTHROUGH_FRAGMENT).unwrap();
    let vertex_buffer = VertexBuffer::with_data(&ctx, &[0.0; 20], None, None);
    let buffer = vertex_buffer.handle();
    driver.clear_calls();

    let vertex_array = VertexArray::new(&ctx)
        .with_vertex_buffer(vertex_buffer)
        .with_attribute("position", 3)
        .with_attribute("uv", 2)
        .finish(&mut program);
    let array = vertex_array.handle();

    assert_eq!(driver.calls(), vec![
        Call::GenVertexArray(array),
        Call::BindVertexArray(array),
        Call::BindBuffer(BufferTarget::Array, buffer),
        Call::AttribLocation(program.handle(), "position".to_owned()),
        Call::EnableVertexAttribArray(0),
        Call::VertexAttribPointer { index: 0, components: 3, stride: 20, offset: 0 },
        Call::AttribLocation(program.handle(), "uv".to_owned()),
        Call::EnableVertexAttribArray(1),
        Call::VertexAttribPointer { index: 1, components: 2, stride: 20, offset: 12 },
        Call::BindBuffer(BufferTarget::Array, 0),
        Call::BindVertexArray(0),
    ]);
}

#[test]
fn explicit_stride_is_used() {
    let (_driver, ctx) = context();

    let vertex_array = VertexArray::new(&ctx)
        .with_vertex_buffer(VertexBuffer::with_data(&ctx, &[0.0; 16], None, Some(32)))
        .with_attribute("position", 3)
        .with_attribute("color", 4);

    assert_eq!(vertex_array.layout(), vec![
        AttributeLayout { offset: 0, stride: 32 },
        AttributeLayout { offset: 12, stride: 32 },
    ]);
}

#[test]
fn inactive_attributes_are_skipped_without_shifting_offsets() {
    let (driver, ctx) = context();
    driver.set_location("uv", 2);

    let mut program = Program::new(&ctx, PASSTHROUGH_VERTEX, PASSTHROUGH_FRAGMENT).unwrap();
    driver.clear_calls();

    let _vertex_array = VertexArray::new(&ctx)
        .with_vertex_buffer(VertexBuffer::with_data(&ctx, &[0.0; 10], None, None))
        .with_attribute("normal", 3)
        .with_attribute("uv", 2)
        .finish(&mut program);

    let setup: Vec<Call> = driver.calls().into_iter().filter(is_attribute_setup).collect();
    assert_eq!(setup, vec![
        Call::EnableVertexAttribArray(2),
        Call::VertexAttribPointer { index: 2, components: 2, stride: 20, offset: 12 },
    ]);
}

#[test]
fn missing_vertex_buffer_enables_nothing() {
    let (driver, ctx) = context();
    driver.set_location("position", 0);

    let mut program = Program::new(&ctx, PASSTHROUGH_VERTEX, PASSTHROUGH_FRAGMENT).unwrap();
    driver.clear_calls();

    let vertex_array = VertexArray::new(&ctx)
        .with_attribute("position", 3)
        .finish(&mut program);
    let array = vertex_array.handle();

    assert_eq!(driver.count(is_attribute_setup), 0);
    assert_eq!(driver.calls().last(), Some(&Call::BindVertexArray(0)));
    assert!(driver.calls().contains(&Call::BindVertexArray(array)));
}

#[test]
fn index_buffer_is_bound_while_array_is_bound() {
    let (driver, ctx) = context();
    let mut program = Program::new(&ctx, PASSTHROUGH_VERTEX, PASSTHROUGH_FRAGMENT).unwrap();

    let index_buffer = IndexBuffer::with_data(&ctx, &[0u16, 1, 2], None);
    let indices = index_buffer.handle();
    driver.clear_calls();

    let vertex_array = VertexArray::new(&ctx)
        .with_vertex_buffer(VertexBuffer::with_data(&ctx, &[0.0; 9], None, None))
        .with_index_buffer(index_buffer)
        .finish(&mut program);

    let calls = driver.calls();
    let bound = calls.iter().position(|call| *call == Call::BindVertexArray(vertex_array.handle())).unwrap();
    let indexed = calls.iter().position(|call| *call == Call::BindBuffer(BufferTarget::ElementArray, indices)).unwrap();
    let unbound = calls.iter().position(|call| *call == Call::BindVertexArray(0)).unwrap();
    assert!(bound < indexed && indexed < unbound);
}

#[test]
fn drop_releases_array_and_buffers() {
    let (driver, ctx) = context();

    let vertex_array = VertexArray::new(&ctx)
        .with_vertex_buffer(VertexBuffer::with_data(&ctx, &[0.0; 3], None, None))
        .with_index_buffer(IndexBuffer::with_data(&ctx, &[0u8], None));
    let array = vertex_array.handle();
    let vertices = vertex_array.vertex_buffer().unwrap().handle();
    let indices = vertex_array.index_buffer().unwrap().handle();
    driver.clear_calls();

    drop(vertex_array);

    let calls = driver.calls();
    assert!(calls.contains(&Call::DeleteVertexArray(array)));
    assert!(calls.contains(&Call::DeleteBuffer(vertices)));
    assert!(calls.contains(&Call::DeleteBuffer(indices)));
}
