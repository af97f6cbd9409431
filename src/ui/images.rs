// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page image previews.
//!
//! Images referenced by `file://` URLs are decoded on a background thread
//! and turned into egui textures once ready. Remote URLs are not fetched.

use signbook::store::DirMediaStore;
use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Decoded RGBA pixels.
struct LoadedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

enum Slot {
    Loading,
    Ready(egui::TextureHandle),
    Failed,
}

pub struct ImageCache {
    slots: HashMap<String, Slot>,
    sender: Sender<(String, Result<LoadedImage, String>)>,
    receiver: Receiver<(String, Result<LoadedImage, String>)>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

fn load_image(path: &Path) -> Result<LoadedImage, String> {
    let img = image::open(path).map_err(|e| e.to_string())?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

impl ImageCache {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            slots: HashMap::new(),
            sender,
            receiver,
        }
    }

    /// Turn finished background loads into textures.
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok((url, result)) = self.receiver.try_recv() {
            let slot = match result {
                Ok(loaded) => {
                    let size = [loaded.width as usize, loaded.height as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                    let texture = ctx.load_texture(url.clone(), color_image, egui::TextureOptions::LINEAR);
                    log::info!("Loaded image {} ({}x{})", url, loaded.width, loaded.height);
                    Slot::Ready(texture)
                }
                Err(e) => {
                    log::error!("Failed to load image {}: {}", url, e);
                    Slot::Failed
                }
            };
            self.slots.insert(url, slot);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.slots.values().any(|s| matches!(s, Slot::Loading))
    }

    /// Texture for `url`, starting a background load on first request.
    pub fn texture(&mut self, url: &str) -> Option<egui::TextureHandle> {
        match self.slots.get(url) {
            Some(Slot::Ready(texture)) => return Some(texture.clone()),
            Some(_) => return None,
            None => {}
        }

        let Some(path) = DirMediaStore::local_path(url) else {
            self.slots.insert(url.to_string(), Slot::Failed);
            return None;
        };
        self.slots.insert(url.to_string(), Slot::Loading);

        let sender = self.sender.clone();
        let url = url.to_string();
        std::thread::spawn(move || {
            let result = load_image(&path);
            let _ = sender.send((url, result));
        });
        None
    }
}
