//! A minimal sdl2 front-end: opens a window, copies `Console::ppu.frame_buffer`
//! into an RGB24 texture once per emulated frame, and maps keyboard events
//! onto controller 1. Structure (window/texture/event-loop/key-map shape)
//! kept from the teacher's `screen/mod.rs::run`; the `ActionNES`/`Frame`/
//! `PpuState` calls it made are replaced with the new `Console` API.

use std::collections::HashMap;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;

use crate::console::Console;
use crate::controller::ControllerState;
use crate::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Runs `console` in an sdl2 window until the user quits. `console` is
/// expected to already have a ROM loaded and `reset()` called.
pub fn run(mut console: Console) {
    let sdl_context = sdl2::init().unwrap();
    let video_subsystem = sdl_context.video().unwrap();
    let window = video_subsystem
        .window("NES", (SCREEN_WIDTH as u32) * 3, (SCREEN_HEIGHT as u32) * 3)
        .position_centered()
        .build()
        .unwrap();

    let mut canvas = window.into_canvas().present_vsync().build().unwrap();
    let mut event_pump = sdl_context.event_pump().unwrap();
    canvas.set_scale(3.0, 3.0).unwrap();

    let creator = canvas.texture_creator();
    let mut texture = creator
        .create_texture_target(PixelFormatEnum::RGB24, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)
        .unwrap();

    let mut key_map = HashMap::new();
    key_map.insert(Keycode::A, ControllerState::A);
    key_map.insert(Keycode::S, ControllerState::B);
    key_map.insert(Keycode::Q, ControllerState::SELECT);
    key_map.insert(Keycode::W, ControllerState::START);
    key_map.insert(Keycode::Up, ControllerState::UP);
    key_map.insert(Keycode::Down, ControllerState::DOWN);
    key_map.insert(Keycode::Left, ControllerState::LEFT);
    key_map.insert(Keycode::Right, ControllerState::RIGHT);

    let mut frame_bytes = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];

    loop {
        if let Err(err) = console.step_frame() {
            log::error!("emulation halted: {err}");
            return;
        }

        for (pixel, (r, g, b)) in console.ppu.frame_buffer.iter().enumerate() {
            frame_bytes[pixel * 3] = *r;
            frame_bytes[pixel * 3 + 1] = *g;
            frame_bytes[pixel * 3 + 2] = *b;
        }
        texture
            .update(None, &frame_bytes, SCREEN_WIDTH * 3)
            .unwrap();
        canvas.copy(&texture, None, None).unwrap();
        canvas.present();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => std::process::exit(0),
                Event::KeyDown { keycode: Some(key), .. } => {
                    if let Some(button) = key_map.get(&key) {
                        console.set_button(0, *button, true);
                    }
                }
                Event::KeyUp { keycode: Some(key), .. } => {
                    if let Some(button) = key_map.get(&key) {
                        console.set_button(0, *button, false);
                    }
                }
                _ => {}
            }
        }
    }
}
