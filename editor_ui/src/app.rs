//! Main editor application with GPU rendering.

use crate::dialogs::{display_name, DesktopShell};
use crate::error::UiError;
use crate::font::{self, CHECK_MARK};
use crate::gpu_renderer::{FontRole, GpuRenderer};
use crate::input::{self, EditorCommand, InputHandler};
use crate::layout::{self, Layout};
use notepad_core::{BufferWidget, Command, DocumentController, DocumentResult, Editor};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, ModifiersState};
use winit::window::{Window, WindowId};

/// Cursor blink interval in milliseconds.
const CURSOR_BLINK_INTERVAL_MS: u64 = 530;

/// Command bar font size in points. Not affected by zoom.
const UI_FONT_POINTS: u32 = 10;

/// Initial window size in logical pixels.
const WINDOW_SIZE: (f64, f64) = (800.0, 600.0);
const MIN_WINDOW_SIZE: (f64, f64) = (400.0, 300.0);

/// Caret width in logical pixels.
const CARET_WIDTH: f32 = 2.0;

/// The document being edited, with everything the window needs around it.
pub struct EditorApp {
    pub document: DocumentController<Editor, DesktopShell>,
    pub input_handler: InputHandler,
    /// System clipboard. `None` when the platform refused access.
    clipboard: Option<arboard::Clipboard>,
    /// Whether the cursor is currently visible (for blinking).
    pub cursor_visible: bool,
    /// Last time the cursor blink state changed.
    pub last_cursor_blink: Instant,
    /// Command bar entry under the mouse, shown with its shortcut.
    pub hovered: Option<Command>,
}

impl Default for EditorApp {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorApp {
    /// Creates an untitled, empty document.
    pub fn new() -> Self {
        let clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                log::warn!("Clipboard unavailable: {err}");
                None
            }
        };
        Self {
            document: DocumentController::new(Editor::new(), DesktopShell::new()),
            input_handler: InputHandler::new(),
            clipboard,
            cursor_visible: true,
            last_cursor_blink: Instant::now(),
            hovered: None,
        }
    }

    /// Loads a file given on the command line.
    pub fn load(&mut self, path: &Path) -> DocumentResult<()> {
        self.document.load(path)?;
        log::info!("Loaded {}", display_name(path));
        Ok(())
    }

    /// Resets the cursor blink state (makes cursor visible and restarts timer).
    pub fn reset_cursor_blink(&mut self) {
        self.cursor_visible = true;
        self.last_cursor_blink = Instant::now();
    }

    /// Updates the cursor blink state. Returns true if a redraw is needed.
    pub fn update_cursor_blink(&mut self) -> bool {
        let elapsed = self.last_cursor_blink.elapsed();
        if elapsed >= Duration::from_millis(CURSOR_BLINK_INTERVAL_MS) {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_blink = Instant::now();
            true
        } else {
            false
        }
    }

    /// Records how many lines and columns fit the text area. The caret is
    /// only pulled back into view when the area actually changed size, so a
    /// wheel scroll away from the caret survives redraws.
    pub fn set_viewport(&mut self, lines: usize, cols: usize) {
        let editor = self.document.widget_mut();
        if editor.visible_lines() == lines.max(1) && editor.visible_cols() == cols.max(1) {
            return;
        }
        editor.set_visible_lines(lines);
        editor.set_visible_cols(cols);
        editor.scroll_to_cursor();
    }

    /// Whether the controller has closed the document for good.
    pub fn should_exit(&self) -> bool {
        self.document.shell().exit_requested()
    }

    /// Runs one command against the document.
    pub fn execute(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::App(command) => {
                self.document.execute(command);
                self.document.widget_mut().scroll_to_cursor();
            }
            EditorCommand::Copy => self.copy(),
            EditorCommand::Cut => self.cut(),
            EditorCommand::Paste => self.paste(),
            other => {
                input::apply_to_editor(self.document.widget_mut(), &other);
            }
        }
        self.reset_cursor_blink();
    }

    fn copy(&mut self) {
        let Some(text) = self.document.widget().selected_text() else {
            return;
        };
        self.set_clipboard(text);
    }

    fn cut(&mut self) {
        if let Some(text) = self.document.widget_mut().take_selection() {
            self.set_clipboard(text);
        }
    }

    fn paste(&mut self) {
        let Some(clipboard) = self.clipboard.as_mut() else {
            return;
        };
        match clipboard.get_text() {
            Ok(text) => {
                input::paste(self.document.widget_mut(), &text);
            }
            Err(err) => log::debug!("Nothing to paste: {err}"),
        }
    }

    fn set_clipboard(&mut self, text: String) {
        if let Some(clipboard) = self.clipboard.as_mut() {
            if let Err(err) = clipboard.set_text(text) {
                log::warn!("Failed to copy to clipboard: {err}");
            }
        }
    }

    /// Converts a point in the text area to a (line, column) in the buffer.
    pub fn screen_to_buffer_position(
        &self,
        x: f32,
        y: f32,
        layout: &Layout,
        char_width: f32,
        line_height: f32,
    ) -> (usize, usize) {
        let editor = self.document.widget();
        let buffer = editor.buffer();

        let y = (y - layout.text.y).max(0.0);
        let screen_line = (y / line_height).floor() as usize;
        let line = (editor.scroll_offset() + screen_line).min(buffer.len_lines().saturating_sub(1));

        let x = (x - layout.text.x).max(0.0);
        let col = (x / char_width).round() as usize + editor.horizontal_scroll();
        (line, col.min(buffer.line_len_chars(line)))
    }

    /// Builds the frame's draw list.
    pub fn render(&self, renderer: &mut GpuRenderer, layout: &Layout, scale: f32) {
        renderer.clear();
        self.render_command_bar(renderer, layout);
        self.render_text_area(renderer, layout, scale);
        self.render_scrollbar(renderer, layout);
        self.render_hint(renderer, layout, scale);
    }

    fn render_command_bar(&self, renderer: &mut GpuRenderer, layout: &Layout) {
        let theme = self.document.widget().theme();
        let read_only = self.document.presentation().is_read_only();
        let char_width = renderer.atlas(FontRole::Ui).char_width;

        let bar = layout.bar;
        renderer.draw_rect(bar.x, bar.y, bar.width, bar.height, theme.scrollbar_trough);

        let text_y = bar.y + (bar.height - renderer.atlas(FontRole::Ui).line_height) / 2.0;
        for item in &layout.items {
            let mut x = item.text_x;
            if layout::is_toggle(item.command) {
                let active = item.command == Command::ToggleReadOnly && read_only;
                if active {
                    let rect = item.rect;
                    renderer.draw_rect(rect.x, rect.y, rect.width, rect.height, theme.selection_background);
                    renderer.draw_char(FontRole::Ui, CHECK_MARK, x, text_y, theme.foreground);
                }
                x += 2.0 * char_width;
            }
            renderer.draw_text(FontRole::Ui, layout::bar_label(item.command), x, text_y, theme.foreground);
        }
    }

    fn render_hint(&self, renderer: &mut GpuRenderer, layout: &Layout, scale: f32) {
        let Some(command) = self.hovered else {
            return;
        };
        let theme = self.document.widget().theme();
        let text = layout::hint_text(command);
        let atlas = renderer.atlas(FontRole::Ui);
        let (char_width, line_height) = (atlas.char_width, atlas.line_height);
        let Some(rect) =
            layout.hint_rect(command, text.chars().count(), char_width, line_height, scale)
        else {
            return;
        };

        let border = scale.max(1.0);
        renderer.draw_overlay_rect(rect.x, rect.y, rect.width, rect.height, theme.foreground);
        renderer.draw_overlay_rect(
            rect.x + border,
            rect.y + border,
            rect.width - 2.0 * border,
            rect.height - 2.0 * border,
            theme.scrollbar_trough,
        );
        let inset_x = (rect.width - text.chars().count() as f32 * char_width) / 2.0;
        let inset_y = (rect.height - line_height) / 2.0;
        renderer.draw_text(
            FontRole::Ui,
            &text,
            rect.x + inset_x,
            rect.y + inset_y,
            theme.foreground,
        );
    }

    fn render_text_area(&self, renderer: &mut GpuRenderer, layout: &Layout, scale: f32) {
        let editor = self.document.widget();
        let theme = editor.theme();
        let atlas = renderer.atlas(FontRole::Text);
        let line_height = atlas.line_height;
        let char_width = atlas.char_width;

        let frame = layout.frame;
        renderer.draw_rect(frame.x, frame.y, frame.width, frame.height, theme.frame_background);
        let inner_x = frame.x + (layout.text.x - frame.x) / 2.0;
        let inner_y = frame.y + (layout.text.y - frame.y) / 2.0;
        renderer.draw_rect(
            inner_x,
            inner_y,
            layout.scrollbar.x - inner_x,
            layout.scrollbar.bottom() - inner_y,
            theme.background,
        );

        let text = layout.text;
        let buffer = editor.buffer();
        let first_line = editor.scroll_offset();
        let first_col = editor.horizontal_scroll();
        let visible_cols = layout.visible_cols(char_width);
        let selection = editor.selected_range();

        for screen_line in 0..editor.visible_lines() {
            let line = first_line + screen_line;
            let Some(line_text) = buffer.line(line) else {
                break;
            };
            let y = text.y + screen_line as f32 * line_height;
            let line_start = buffer.line_start(line);

            // Selection covers the line break too, like a native text widget.
            let selected = selection.and_then(|(start, end)| {
                let line_end = line_start + line_text.chars().count();
                (start <= line_end && end > line_start)
                    .then(|| (start.saturating_sub(line_start), end - line_start))
            });

            if let Some((sel_start, sel_end)) = selected {
                let from = sel_start.max(first_col) - first_col;
                let to = sel_end.saturating_sub(first_col).min(visible_cols);
                if to > from {
                    renderer.draw_rect(
                        text.x + from as f32 * char_width,
                        y,
                        (to - from) as f32 * char_width,
                        line_height,
                        theme.selection_background,
                    );
                }
            }

            for (i, ch) in line_text.chars().skip(first_col).take(visible_cols).enumerate() {
                let col = first_col + i;
                let color = match selected {
                    Some((start, end)) if col >= start && col < end => theme.selection_foreground,
                    _ => theme.foreground,
                };
                let ch = if ch == '\t' { ' ' } else { ch };
                renderer.draw_char(FontRole::Text, ch, text.x + i as f32 * char_width, y, color);
            }
        }

        let caret = editor.cursor_position();
        let on_screen = caret.line >= first_line
            && caret.line < first_line + editor.visible_lines()
            && caret.col >= first_col
            && caret.col <= first_col + visible_cols;
        if self.cursor_visible && editor.is_editable() && on_screen {
            let x = text.x + (caret.col - first_col) as f32 * char_width;
            let y = text.y + (caret.line - first_line) as f32 * line_height;
            renderer.draw_rect(x, y, CARET_WIDTH * scale, line_height, theme.caret);
        }
    }

    fn render_scrollbar(&self, renderer: &mut GpuRenderer, layout: &Layout) {
        let editor = self.document.widget();
        let theme = editor.theme();
        let track = layout.scrollbar;
        renderer.draw_rect(track.x, track.y, track.width, track.height, theme.scrollbar_trough);

        let thumb = layout.scrollbar_thumb(
            editor.scroll_offset(),
            editor.visible_lines(),
            editor.buffer().len_lines(),
        );
        renderer.draw_rect(thumb.x + 1.0, thumb.y, thumb.width - 2.0, thumb.height, theme.scrollbar_thumb);
    }
}

/// GPU state for rendering.
struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    scale: f64,
    renderer: GpuRenderer,
    layout: Layout,
}

impl GpuState {
    fn new(window: Arc<Window>, font_points: u32) -> Result<Self, UiError> {
        let size = window.inner_size();
        let scale = window.scale_factor();
        let font = font::load_system_font()?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(UiError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        // Theme colors are sRGB values already, so they are written as-is.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(UiError::NoAdapter)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = GpuRenderer::new(
            &device,
            &queue,
            surface_format,
            size.width.max(1),
            size.height.max(1),
            font,
            font::points_to_pixels(UI_FONT_POINTS, scale),
            font::points_to_pixels(font_points, scale),
        );

        let mut state = Self {
            surface,
            device,
            queue,
            config,
            size,
            scale,
            renderer,
            layout: Layout::default(),
        };
        state.relayout();
        Ok(state)
    }

    fn relayout(&mut self) {
        let ui = self.renderer.atlas(FontRole::Ui);
        self.layout = Layout::compute(
            self.size.width as f32,
            self.size.height as f32,
            self.scale as f32,
            ui.char_width,
            ui.line_height,
        );
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.renderer
                .resize(&self.queue, new_size.width, new_size.height);
            self.relayout();
        }
    }

    fn rescale(&mut self, scale: f64) {
        self.scale = scale;
        let px = font::points_to_pixels(UI_FONT_POINTS, scale);
        self.renderer
            .set_font_px(&self.device, &self.queue, FontRole::Ui, px);
        self.relayout();
    }

    /// Rebuilds the text atlas when the zoom level changed.
    fn sync_font_size(&mut self, points: u32) {
        let px = font::points_to_pixels(points, self.scale);
        self.renderer
            .set_font_px(&self.device, &self.queue, FontRole::Text, px);
    }

    fn render(&mut self, app: &EditorApp) {
        app.render(&mut self.renderer, &self.layout, self.scale as f32);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let clear = app.document.widget().theme().frame_background;
        self.renderer.render(&self.device, &self.queue, &view, clear);

        output.present();
    }

    fn line_height(&self) -> f32 {
        self.renderer.atlas(FontRole::Text).line_height
    }

    fn char_width(&self) -> f32 {
        self.renderer.atlas(FontRole::Text).char_width
    }
}

/// Application state wrapper for winit 0.30.
struct AppState {
    app: EditorApp,
    gpu: Option<GpuState>,
    window: Option<Arc<Window>>,
    modifiers: ModifiersState,
    /// Current mouse position.
    mouse_position: PhysicalPosition<f64>,
    /// Whether the left mouse button is pressed (for drag selection).
    mouse_dragging: bool,
    /// First fatal error, reported by [`run`] after the loop ends.
    error: Option<UiError>,
}

impl AppState {
    fn new(app: EditorApp) -> Self {
        Self {
            app,
            gpu: None,
            window: None,
            modifiers: ModifiersState::empty(),
            mouse_position: PhysicalPosition::new(0.0, 0.0),
            mouse_dragging: false,
            error: None,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Runs a command, then closes the loop if the document exited.
    fn execute(&mut self, command: EditorCommand, event_loop: &ActiveEventLoop) {
        self.app.execute(command);
        if self.app.should_exit() {
            event_loop.exit();
            return;
        }
        self.sync_view();
        self.request_redraw();
    }

    /// Brings the text atlas and the visible line/column counts in line
    /// with the current zoom and window size.
    fn sync_view(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.sync_font_size(self.app.document.presentation().font_size());

        let lines = gpu.layout.visible_lines(gpu.line_height());
        let cols = gpu.layout.visible_cols(gpu.char_width());
        self.app.set_viewport(lines, cols);
    }

    fn handle_mouse_press(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let (x, y) = (self.mouse_position.x as f32, self.mouse_position.y as f32);

        if gpu.layout.bar.contains(x, y) {
            self.mouse_dragging = false;
            if let Some(command) = gpu.layout.hit_test(x, y) {
                log::debug!("Command bar: {command:?}");
                self.execute(EditorCommand::App(command), event_loop);
            }
            return;
        }

        if !gpu.layout.text.contains(x, y) {
            self.mouse_dragging = false;
            return;
        }

        let (line, col) = self.app.screen_to_buffer_position(
            x,
            y,
            &gpu.layout,
            gpu.char_width(),
            gpu.line_height(),
        );
        let extend = self.modifiers.shift_key();
        self.app
            .document
            .widget_mut()
            .set_cursor_position(line, col, extend);
        self.app.reset_cursor_blink();
        self.request_redraw();
    }

    fn handle_mouse_drag(&mut self) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let (line, col) = self.app.screen_to_buffer_position(
            self.mouse_position.x as f32,
            self.mouse_position.y as f32,
            &gpu.layout,
            gpu.char_width(),
            gpu.line_height(),
        );
        let editor = self.app.document.widget_mut();
        editor.set_cursor_position(line, col, true);
        editor.scroll_to_cursor();
        self.request_redraw();
    }

    fn update_hover(&mut self) {
        let hovered = match &self.gpu {
            Some(gpu) if !self.mouse_dragging => gpu
                .layout
                .hit_test(self.mouse_position.x as f32, self.mouse_position.y as f32),
            _ => None,
        };
        if hovered != self.app.hovered {
            self.app.hovered = hovered;
            self.request_redraw();
        }
    }

    fn fail(&mut self, err: UiError, event_loop: &ActiveEventLoop) {
        log::error!("{err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.app.document.shell().title())
            .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1))
            .with_min_inner_size(LogicalSize::new(MIN_WINDOW_SIZE.0, MIN_WINDOW_SIZE.1));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(err.into(), event_loop),
        };

        let font_points = self.app.document.presentation().font_size();
        let gpu = match GpuState::new(window.clone(), font_points) {
            Ok(gpu) => gpu,
            Err(err) => return self.fail(err, event_loop),
        };

        self.app.document.shell_mut().attach(window.clone());
        self.window = Some(window.clone());
        self.gpu = Some(gpu);
        self.sync_view();
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.execute(EditorCommand::App(Command::Exit), event_loop);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
                self.sync_view();
                self.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.rescale(scale_factor);
                }
                self.sync_view();
                self.request_redraw();
            }
            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.modifiers = new_modifiers.state();
                self.app
                    .input_handler
                    .update_modifiers_state(self.modifiers);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        logical_key,
                        ..
                    },
                ..
            } => {
                if state != ElementState::Pressed {
                    return;
                }
                if let Some(command) = self
                    .app
                    .input_handler
                    .handle_key_event(&logical_key, state)
                {
                    self.execute(command, event_loop);
                    return;
                }

                if let Key::Character(text) = &logical_key {
                    let command = text
                        .chars()
                        .next()
                        .and_then(|ch| self.app.input_handler.handle_char_input(ch));
                    if let Some(command) = command {
                        self.execute(command, event_loop);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(command) = self.app.input_handler.handle_scroll(delta) {
                    self.execute(command, event_loop);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = position;
                if self.mouse_dragging {
                    self.handle_mouse_drag();
                }
                self.update_hover();
            }
            WindowEvent::CursorLeft { .. } => {
                if self.app.hovered.take().is_some() {
                    self.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    match state {
                        ElementState::Pressed => {
                            self.mouse_dragging = true;
                            self.handle_mouse_press(event_loop);
                        }
                        ElementState::Released => {
                            self.mouse_dragging = false;
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.app.update_cursor_blink();
                self.sync_view();

                if let Some(gpu) = &mut self.gpu {
                    gpu.render(&self.app);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Sleep until the caret is due to blink.
        let next_blink = self.app.last_cursor_blink + Duration::from_millis(CURSOR_BLINK_INTERVAL_MS);
        if Instant::now() >= next_blink {
            self.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(next_blink));
        }
    }
}

/// Runs the editor until the document exits or the window fails.
pub fn run(app: EditorApp) -> Result<(), UiError> {
    let event_loop = EventLoop::new()?;
    let mut state = AppState::new(app);
    event_loop.run_app(&mut state)?;
    match state.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_toggles_after_interval() {
        let mut app = EditorApp::new();
        assert!(!app.update_cursor_blink());
        assert!(app.cursor_visible);

        app.last_cursor_blink = Instant::now() - Duration::from_millis(CURSOR_BLINK_INTERVAL_MS + 10);
        assert!(app.update_cursor_blink());
        assert!(!app.cursor_visible);

        app.reset_cursor_blink();
        assert!(app.cursor_visible);
    }

    #[test]
    fn test_view_commands_do_not_dirty() {
        let mut app = EditorApp::new();
        app.execute(EditorCommand::App(Command::ZoomIn));
        app.execute(EditorCommand::App(Command::DarkMode));
        app.execute(EditorCommand::App(Command::ToggleReadOnly));

        assert_eq!(app.document.presentation().font_size(), 13);
        assert!(app.document.presentation().is_read_only());
        assert!(!app.document.is_dirty());
        assert!(!app.should_exit());
    }

    #[test]
    fn test_typing_goes_through_editor() {
        let mut app = EditorApp::new();
        app.execute(EditorCommand::InsertChar('a'));
        app.execute(EditorCommand::InsertNewline);
        assert_eq!(app.document.widget().text(), "a\n");
        assert!(app.document.is_dirty());
    }

    #[test]
    fn test_wheel_scroll_survives_redraw() {
        let mut app = EditorApp::new();
        app.document.widget_mut().insert_text(&"line\n".repeat(10));
        app.set_viewport(3, 80);
        app.execute(EditorCommand::Move {
            motion: input::Motion::BufferStart,
            extend: false,
        });
        assert_eq!(app.document.widget().scroll_offset(), 0);

        app.execute(EditorCommand::Scroll(5));
        // Every redraw re-syncs the viewport with unchanged dimensions.
        app.set_viewport(3, 80);
        app.set_viewport(3, 80);
        assert_eq!(app.document.widget().scroll_offset(), 5);

        // A real resize brings the caret back into view.
        app.set_viewport(4, 80);
        assert_eq!(app.document.widget().scroll_offset(), 0);
    }

    #[test]
    fn test_exit_when_clean_needs_no_dialog() {
        let mut app = EditorApp::new();
        app.execute(EditorCommand::App(Command::Exit));
        assert!(app.should_exit());
    }

    #[test]
    fn test_screen_to_buffer_position() {
        let mut app = EditorApp::new();
        app.document.widget_mut().insert_text("hello\nhi");
        let layout = Layout::compute(800.0, 600.0, 1.0, 8.0, 16.0);
        let (x0, y0) = (layout.text.x, layout.text.y);

        assert_eq!(app.screen_to_buffer_position(x0 + 1.0, y0 + 1.0, &layout, 10.0, 20.0), (0, 0));
        assert_eq!(app.screen_to_buffer_position(x0 + 31.0, y0 + 5.0, &layout, 10.0, 20.0), (0, 3));
        // Past the end of a short line clamps to its length.
        assert_eq!(app.screen_to_buffer_position(x0 + 500.0, y0 + 25.0, &layout, 10.0, 20.0), (1, 2));
        // Below the last line lands on the last line.
        assert_eq!(app.screen_to_buffer_position(x0, y0 + 400.0, &layout, 10.0, 20.0), (1, 0));
    }
}
