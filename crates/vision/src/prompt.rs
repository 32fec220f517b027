/// Fixed instruction sent with every photo.
///
/// Asks for one `category: <number>` line per category and restricts counting
/// to items near the camera. The distance limit is an instruction to the
/// model only; nothing downstream verifies it.
pub const CLASSIFICATION_PROMPT: &str = "\
You are a trash classifier and counter.
Analyze the image and only count the items that appear to be within a close range, \
approximately 5 feet from the camera. Ignore any objects that seem to be far away in the background.
For each object category (cardboard, glass, metal, paper, plastic, trash) in the image, \
count how many of these nearby items are present.
Return only a structured response in the format:
cardboard: <number>
glass: <number>
metal: <number>
paper: <number>
plastic: <number>
trash: <number>
If there is no object of a category, return 0 for that category.";
