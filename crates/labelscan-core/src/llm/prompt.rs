//! Prompt assembly: one Russian instruction part followed by the images.

use crate::pipeline::EncodedImage;
use crate::schema::SchemaTemplate;

use super::provider::Message;

/// Instruction text with the serialized template embedded.
///
/// Asks the model to pull all Russian-language text off the images, fill the
/// template, and answer strictly in JSON.
pub fn instruction_text(template: &SchemaTemplate) -> String {
    format!(
        "Извлеки весь текст на русском языке с изображений, \
         заполни информацию о продукте по этой схеме {} \
         и ВЕРНИ РЕЗУЛЬТАТ СТРОГО В JSON ФОРМАТЕ",
        template.to_json_string()
    )
}

/// Build the user turn: the instruction, then one image part per image in order.
pub fn build_message(template: &SchemaTemplate, images: &[EncodedImage]) -> Message {
    let mut message = Message::text(instruction_text(template));
    for image in images {
        message.push_image(image);
    }
    message
}
