// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen
//!
//! What is shown is a pure function of the screen state:
//!
//! - camera permission unknown: "Requesting camera permission..."
//! - camera permission denied: "No access to camera", nothing else camera related
//! - camera permission granted: viewfinder with the capture button at the bottom
//! - an image was captured: preview and save button, below the camera section

use crate::app::state::{AppModel, CameraBranch, Message};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length, alignment};
use cosmic::widget;

impl AppModel {
    pub fn build_capture_screen(&self) -> Element<'_, Message> {
        let camera_section = match self.screen.camera_branch() {
            CameraBranch::RequestingPermission => status_text(fl!("requesting-camera-permission")),
            CameraBranch::NoAccess => status_text(fl!("no-camera-access")),
            CameraBranch::Viewfinder => self.build_viewfinder(),
        };

        let mut column = widget::column()
            .push(camera_section)
            .spacing(ui::SECTION_SPACING)
            .align_x(Alignment::Center)
            .width(Length::Fill);

        if let Some(preview) = self.build_preview_section() {
            column = column.push(preview);
        }

        column.into()
    }

    /// Live feed in a fixed-height region with the capture button on top
    fn build_viewfinder(&self) -> Element<'_, Message> {
        let feed: Element<'_, Message> = match &self.viewfinder_handle {
            Some(handle) => widget::image(handle.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => {
                let (r, g, b) = ui::VIEWFINDER_PLACEHOLDER_RGB;
                widget::container(widget::text(fl!("starting-camera")).size(ui::STATUS_TEXT_SIZE))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .style(move |_theme| widget::container::Style {
                        background: Some(Background::Color(Color::from_rgb8(r, g, b))),
                        text_color: Some(Color::WHITE),
                        ..Default::default()
                    })
                    .into()
            }
        };

        let controls = widget::container(self.build_capture_button())
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Bottom)
            .padding([0, 0, ui::CAPTURE_BUTTON_BOTTOM_OFFSET, 0]);

        widget::container(cosmic::iced::widget::stack![feed, controls])
            .width(Length::Fill)
            .height(Length::Fixed(ui::VIEWFINDER_HEIGHT))
            .into()
    }

    /// Captured still with the save button, when an image exists
    fn build_preview_section(&self) -> Option<Element<'_, Message>> {
        if !self.screen.has_preview() {
            return None;
        }

        let preview: Element<'_, Message> = match &self.preview_handle {
            Some(handle) => widget::image(handle.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::Fixed(ui::PREVIEW_SIZE))
                .height(Length::Fixed(ui::PREVIEW_SIZE))
                .into(),
            None => widget::Space::new(
                Length::Fixed(ui::PREVIEW_SIZE),
                Length::Fixed(ui::PREVIEW_SIZE),
            )
            .into(),
        };

        let framed = widget::container(preview)
            .width(Length::Fixed(ui::PREVIEW_SIZE))
            .height(Length::Fixed(ui::PREVIEW_SIZE))
            .clip(true)
            .style(|_theme| widget::container::Style {
                border: cosmic::iced::Border {
                    radius: ui::PREVIEW_RADIUS.into(),
                    ..Default::default()
                },
                ..Default::default()
            });

        let save_button = widget::button::suggested(fl!("save-image"))
            .on_press_maybe(self.screen.can_save().then_some(Message::Save));

        Some(
            widget::column()
                .push(framed)
                .push(save_button)
                .spacing(cosmic::theme::spacing().space_s)
                .align_x(Alignment::Center)
                .into(),
        )
    }
}

fn status_text<'a>(text: String) -> Element<'a, Message> {
    widget::container(widget::text(text).size(ui::STATUS_TEXT_SIZE))
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
}
