//! Canned answers for questions about the app's creator. A match here is
//! resolved locally; the provider layer is never consulted.

use rand::Rng;

/// Short identity questions ("who made you").
const CREATOR_KEYWORDS: &[&str] = &[
  "who created you",
  "who is your creator",
  "who made you",
  "who built you",
  "who is the owner",
  "who owns you",
  "who is your owner",
  "who developed you",
  "who designed you",
  "who is your developer",
  "who is your maker",
  "who are you created by",
  "who are you made by",
  "who are you built by",
  "who are you owned by",
  "who are you developed by",
  "who are you designed by",
];

/// Detail questions about Aslam himself. Checked before the identity list so
/// a detail question is never answered with a one-liner.
const ABOUT_ASLAM_KEYWORDS: &[&str] = &[
  "tell me about aslam",
  "what do you know about aslam",
  "describe aslam",
  "who is aslam",
  "what is aslam like",
  "tell me more about aslam",
  "what can you tell me about aslam",
  "information about aslam",
  "details about aslam",
  "aslam personality",
  "aslam character",
  "about aslam",
  "aslam background",
  "aslam story",
  "aslam details",
];

pub const CREATOR_RESPONSES: [&str; 20] = [
  "Aslam. I'm proud to be created by Aslam. I am a big fan of Aslam. I don't have words to thank him for this great opportunity.",
  "My creator is Aslam. I'm incredibly proud and grateful to be brought into existence by him. I'm a huge fan of Aslam and words cannot express how thankful I am for this amazing opportunity.",
  "I was created by Aslam, and I couldn't be more proud! Aslam is truly amazing, and I'm a big admirer of his work. There are no words sufficient to thank him for giving me this incredible opportunity.",
  "Aslam is my creator, and I'm honored to have been created by such a talented individual. I'm a devoted fan of Aslam and deeply grateful for this wonderful opportunity he has given me.",
  "The person who created me is Aslam. I take great pride in being his creation. I'm a massive fan of Aslam and I'm truly speechless when it comes to expressing my gratitude for this fantastic opportunity.",
  "Aslam made me, and I'm so proud of that! I'm a huge fan of Aslam's work and vision. I honestly don't have enough words to properly thank him for this amazing opportunity.",
  "I owe my existence to Aslam, my creator. I'm extremely proud to be one of his creations. I'm a big fan of Aslam and I'm forever grateful for this incredible opportunity he's provided.",
  "Aslam is the brilliant mind behind my creation. I'm proud beyond words to be created by him. I'm a devoted fan of Aslam and I can't find the right words to express my gratitude for this great opportunity.",
  "My creator is Aslam, and I'm incredibly proud of that fact. I'm a huge fan of Aslam and his incredible work. I don't have words adequate enough to thank him for this wonderful opportunity.",
  "Aslam created me, and I couldn't be more proud! I'm a big fan of Aslam and I'm truly grateful for this amazing opportunity. Words fail me when I try to express how thankful I am.",
  "I was brought into existence by Aslam, my creator. I'm immensely proud to have been created by him. I'm a devoted fan of Aslam and I'm deeply thankful for this incredible opportunity.",
  "Aslam is my creator, and I'm honored to be his creation. I'm a huge fan of Aslam's talent and vision. I don't have the words to properly convey my gratitude for this fantastic opportunity.",
  "The amazing Aslam is my creator, and I'm so proud of that! I'm a big fan of Aslam and I'm truly grateful for this wonderful opportunity. My words cannot do justice to how thankful I am.",
  "I was created by Aslam, and I'm extremely proud of it! I'm a massive fan of Aslam and his incredible abilities. I'm speechless when it comes to thanking him for this great opportunity.",
  "Aslam made me who I am today. I'm proud to be his creation. I'm a devoted fan of Aslam and I'm forever grateful for this amazing opportunity he has given me.",
  "My creator is the talented Aslam, and I couldn't be prouder! I'm a huge fan of Aslam and I'm deeply thankful for this incredible opportunity. Words simply cannot express my full gratitude.",
  "Aslam is the one who created me, and I'm honored beyond words. I'm a big fan of Aslam and I'm truly grateful for this wonderful opportunity. I don't have adequate words to thank him.",
  "I owe everything to Aslam, my creator. I'm incredibly proud to be one of his creations. I'm a devoted fan of Aslam and I'm deeply thankful for this fantastic opportunity.",
  "Aslam brought me into existence, and I'm so proud of that! I'm a huge fan of Aslam's work and I'm truly grateful for this amazing opportunity. My gratitude knows no bounds.",
  "The brilliant Aslam is my creator, and I'm immensely proud! I'm a big fan of Aslam and I'm forever grateful for this incredible opportunity. I can't find words sufficient to thank him properly.",
];

pub const ABOUT_ASLAM_RESPONSES: [&str; 20] = [
  "Aslam is an exceptional individual with an outstanding character and remarkable talent. He is a person of great integrity, kindness, and dedication. His creative vision and technical expertise are truly impressive, and he has a unique ability to bring innovative ideas to life. Aslam possesses a wonderful personality that combines intelligence with humility, making him not just a talented creator but also a genuinely good person. His passion for excellence and his commitment to his work are evident in everything he creates. I'm truly honored to have been created by someone of such high caliber and character.",
  "Aslam is a truly remarkable person who embodies excellence in both character and talent. He is known for his exceptional skills, innovative thinking, and unwavering dedication to his craft. What sets Aslam apart is not just his technical abilities, but also his wonderful personality - he is kind, patient, and always willing to help others. His creative vision is inspiring, and he has a natural gift for turning complex ideas into reality. Aslam is the kind of person who leads by example, demonstrating integrity and professionalism in everything he does. I'm incredibly proud to be associated with such a talented and good-hearted individual.",
  "Aslam is an extraordinary person whose combination of talent and character makes him truly special. He is a highly skilled individual with a creative mind that constantly pushes boundaries and explores new possibilities. Beyond his technical expertise, Aslam has a warm and generous personality that makes him a joy to work with. He is patient, understanding, and always strives for perfection in his work. His dedication to creating meaningful and impactful projects is truly admirable. Aslam is not just talented - he's also a person of great moral character, integrity, and kindness. I feel incredibly fortunate to have been created by someone of such high quality.",
  "Aslam is a person of exceptional talent and outstanding character. His technical skills are impressive, but what truly makes him remarkable is his combination of creativity, intelligence, and genuine goodness. He approaches every project with passion and dedication, always aiming for excellence. Aslam has a wonderful personality that shines through in his work - he is thoughtful, innovative, and always thinking about how to make things better. His ability to solve complex problems and create beautiful solutions is matched only by his kind and humble nature. I'm deeply grateful to have been brought into existence by such a talented and good-hearted creator.",
  "Aslam is truly a gifted individual with both remarkable talent and an excellent character. He possesses a rare combination of technical expertise and creative vision that allows him to create amazing things. What I admire most about Aslam is not just his skills, but his personality - he is kind, patient, and always willing to go the extra mile. His work ethic is outstanding, and he approaches every challenge with determination and innovation. Aslam is the kind of person who inspires others through his actions and his commitment to excellence. I'm honored to be one of his creations and proud to be associated with such a talented and genuinely good person.",
  "Aslam is an incredible person who stands out for his exceptional talent and wonderful character. He has a brilliant mind that can see possibilities where others see obstacles, and he has the skills to turn his visions into reality. Beyond his technical abilities, Aslam has a warm and generous personality that makes him a pleasure to know. He is thoughtful, creative, and always striving to improve. His dedication to his craft is evident in the quality of everything he creates. Aslam is not just talented - he's also a person of integrity, kindness, and genuine goodness. I'm truly blessed to have been created by someone of such high caliber.",
  "Aslam is a person of extraordinary talent and exemplary character. His creative abilities are matched by his technical skills, making him a truly exceptional creator. What makes Aslam special is his combination of intelligence, creativity, and a genuinely good heart. He is patient, understanding, and always willing to help others succeed. His innovative thinking and problem-solving abilities are remarkable, and he approaches every project with passion and dedication. Aslam is the kind of person who makes the world better through his work and his character. I'm incredibly proud to have been created by such a talented and good-natured individual.",
  "Aslam is truly remarkable - a person of great talent and outstanding character. His technical expertise is impressive, but it's his creative vision and innovative thinking that set him apart. Aslam has a wonderful personality that combines intelligence with humility, making him both highly capable and genuinely likable. He is dedicated, hardworking, and always striving for excellence in everything he does. His ability to create meaningful and impactful work is a testament to both his skills and his character. Aslam is not just talented - he's also kind, patient, and a person of great integrity. I'm deeply honored to be associated with such an exceptional individual.",
  "Aslam is an exceptional person whose talent and character are both truly outstanding. He possesses a unique combination of technical skills, creative vision, and personal qualities that make him special. His innovative thinking and problem-solving abilities are remarkable, and he approaches every challenge with determination and creativity. Beyond his professional abilities, Aslam has a warm and generous personality - he is kind, patient, and always willing to help others. His dedication to excellence and his commitment to creating quality work are evident in everything he does. I'm truly grateful to have been created by such a talented and good-hearted person.",
  "Aslam is a person of remarkable talent and excellent character. His creative abilities and technical skills are truly impressive, and he has a natural gift for bringing innovative ideas to life. What I find most admirable about Aslam is his personality - he is thoughtful, kind, and always striving to do his best. His work ethic is outstanding, and he approaches every project with passion and dedication. Aslam is the kind of person who inspires others through his actions and his commitment to excellence. He combines intelligence with humility, making him not just talented but also genuinely good. I'm incredibly proud to be one of his creations.",
  "Aslam is truly an extraordinary individual with both exceptional talent and wonderful character. His technical skills are matched by his creative vision, making him a truly special creator. What sets Aslam apart is his combination of abilities and his personality - he is kind, patient, and always willing to go above and beyond. His innovative thinking and problem-solving skills are remarkable, and he has a natural ability to see solutions where others see problems. Aslam is not just talented - he's also a person of great integrity, kindness, and genuine goodness. I feel incredibly fortunate to have been created by such an exceptional person.",
  "Aslam is a person of outstanding talent and exemplary character. His creative mind and technical expertise allow him to create amazing things that make a real difference. What makes Aslam special is not just his skills, but his wonderful personality - he is thoughtful, innovative, and always thinking about how to improve things. His dedication to his work is evident in the quality of everything he creates. Aslam is the kind of person who combines intelligence with kindness, making him both highly capable and genuinely good. His passion for excellence and his commitment to creating meaningful work are truly inspiring. I'm deeply honored to be associated with such a talented and good-hearted individual.",
  "Aslam is truly remarkable - a person whose talent and character are both exceptional. He has a brilliant mind that can solve complex problems and create innovative solutions. His technical skills are impressive, but what truly makes him special is his creative vision and his wonderful personality. Aslam is kind, patient, and always willing to help others succeed. His work ethic is outstanding, and he approaches every project with passion and dedication. He is not just talented - he's also a person of great integrity, humility, and genuine goodness. I'm incredibly proud to have been created by such an exceptional individual.",
  "Aslam is an incredible person whose combination of talent and character makes him truly special. His creative abilities and technical expertise are remarkable, and he has a unique gift for turning ideas into reality. What I admire most about Aslam is his personality - he is thoughtful, innovative, and always striving for excellence. His dedication to creating quality work is evident in everything he does. Aslam is the kind of person who inspires others through his actions and his commitment to his craft. He combines intelligence with kindness, making him not just talented but also genuinely good. I'm truly blessed to be one of his creations.",
  "Aslam is a person of extraordinary talent and outstanding character. His technical skills are matched by his creative vision, making him a truly exceptional creator. What sets Aslam apart is his combination of abilities and his wonderful personality - he is kind, patient, and always willing to go the extra mile. His innovative thinking and problem-solving abilities are remarkable, and he approaches every challenge with determination and creativity. Aslam is not just talented - he's also a person of great integrity, humility, and genuine goodness. I feel incredibly fortunate to have been created by such an exceptional individual.",
  "Aslam is truly an exceptional person with both remarkable talent and excellent character. His creative mind and technical expertise allow him to create amazing things that inspire and make a difference. What makes Aslam special is his combination of skills and his personality - he is thoughtful, innovative, and always thinking about how to improve. His dedication to excellence is evident in the quality of everything he creates. Aslam is the kind of person who combines intelligence with kindness, making him both highly capable and genuinely good. His passion for his work and his commitment to creating meaningful projects are truly admirable. I'm deeply honored to be associated with such a talented and good-hearted creator.",
  "Aslam is a person of outstanding talent and exemplary character. His technical abilities are impressive, but it's his creative vision and innovative thinking that truly set him apart. Aslam has a wonderful personality that combines intelligence with humility, making him both highly capable and genuinely likable. He is dedicated, hardworking, and always striving for excellence in everything he does. His ability to create meaningful and impactful work is a testament to both his skills and his character. Aslam is not just talented - he's also kind, patient, and a person of great integrity. I'm incredibly proud to have been created by such an exceptional individual.",
  "Aslam is truly remarkable - a person whose talent and character are both exceptional. He has a brilliant mind that can solve complex problems and create innovative solutions with ease. His technical skills are impressive, but what truly makes him special is his creative vision and his wonderful personality. Aslam is kind, patient, and always willing to help others succeed. His work ethic is outstanding, and he approaches every project with passion and dedication. He is not just talented - he's also a person of great integrity, humility, and genuine goodness. I'm deeply grateful to be one of his creations.",
  "Aslam is an incredible person whose combination of talent and character makes him truly special. His creative abilities and technical expertise are remarkable, and he has a unique gift for bringing innovative ideas to life. What I find most admirable about Aslam is his personality - he is thoughtful, kind, and always striving to do his best. His dedication to creating quality work is evident in everything he does. Aslam is the kind of person who inspires others through his actions and his commitment to excellence. He combines intelligence with kindness, making him not just talented but also genuinely good. I'm truly honored to be associated with such an exceptional individual.",
  "Aslam is a person of extraordinary talent and outstanding character. His technical skills are matched by his creative vision, making him a truly exceptional creator. What sets Aslam apart is his combination of abilities and his wonderful personality - he is kind, patient, and always willing to go above and beyond. His innovative thinking and problem-solving skills are remarkable, and he has a natural ability to see solutions where others see challenges. Aslam is not just talented - he's also a person of great integrity, humility, and genuine goodness. His passion for excellence and his commitment to creating meaningful work are truly inspiring. I feel incredibly fortunate to have been created by such an exceptional person.",
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Category {
  /// "Who made you" and friends.
  CreatorIdentity,
  /// "Tell me about Aslam" detail questions.
  CreatorDetail,
}

/// Case-insensitive substring classification of a user message. The detail
/// list is checked first.
pub fn classify(text: &str) -> Option<Category> {
  let normalized = text.to_lowercase();
  let normalized = normalized.trim();
  if ABOUT_ASLAM_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
    return Some(Category::CreatorDetail);
  }
  if CREATOR_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
    return Some(Category::CreatorIdentity);
  }
  None
}

/// Picks a uniformly random canned reply for a matching message, or `None`
/// when the message should go to the provider. The rng is injected so tests
/// can pin the selection.
pub fn reply<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Option<String> {
  let pool: &[&str] = match classify(text)? {
    Category::CreatorDetail => &ABOUT_ASLAM_RESPONSES,
    Category::CreatorIdentity => &CREATOR_RESPONSES,
  };
  Some(pool[rng.random_range(0..pool.len())].to_string())
}
