//! Static copy: questions, options, category texts, personas and the coach's
//! call-to-action.

use crate::quiz::catalog::{AnswerOption, Category};
use crate::quiz::persona::Persona;
use crate::quiz::scoring::Level;

pub const QUESTIONS: [(u32, Category, &str); 16] = [
    (1, Category::Appearance, "「我有一套自己固定在用的洗臉與保養方式，能讓皮膚大致保持乾淨、氣色穩定，不會長期滿臉痘痘或粉刺」"),
    (2, Category::Appearance, "「我知道自己適合哪一種長度和感覺的髮型，出門前也會花時間整理、吹整或抓造型，不會讓頭髮亂翹、油塌、看起來沒打理」"),
    (3, Category::Appearance, "「我說得出自己適合的大致穿著風格，例如簡約、斯文、成熟，也知道哪些款式和版型特別不適合自己，買衣服時心裡有一把尺」"),
    (4, Category::Appearance, "「我知道自己適合什麼樣風格的穿著，能夠很輕鬆地搭配出適合約會或其他重要場合的服裝，也大概知道去哪裡、要怎麼買衣服才不會踩雷」"),
    (5, Category::SocialPresence, "「我現在的頭貼是近期拍的清楚單人照，看得到我的臉，沒有厚重濾鏡，也不是團體照、背影照或看不出我是誰的照片」"),
    (6, Category::SocialPresence, "「我很清楚自己放什麼樣的照片最有吸引力，也懂得挑出最有優點的幾張，現在交友軟體或社群上的主要照片就是照這個標準選出來的」"),
    (7, Category::SocialPresence, "「我大致知道女生會想看到我哪些面向，也會用幾張不同情境的照片去呈現自己，例如生活感、興趣、朋友互動，而不是只有一堆角度差不多的自拍或證件感照片」"),
    (8, Category::SocialPresence, "「我大致知道哪些照片或貼文會拉低第一印象，例如醉到失態、很邋遢、失言貼文，也有刻意刪掉、關掉或限縮可見範圍，不會全部攤在公開頁面」"),
    (9, Category::Interaction, "「我平常有在經營自己的生活圈，不是只有家和公司，固定會參加一些活動或聚會，也有認識到新朋友的機會」"),
    (10, Category::Interaction, "「我知道怎麼讓聊天往曖昧方向發展，不會一直停在交換資訊、聊天氣和日常小事，也懂得用適度的調侃、自我揭露和關心，讓對方感覺得到我對她有興趣」"),
    (11, Category::Interaction, "「我有主動提出約會邀請的經驗，會說出具體的時間和地點，也能依照對方的狀況安排幾個合適的約會行程」"),
    (12, Category::Interaction, "「約會時，我大致知道怎麼帶話題和安排節奏，不太會整場冷場或讓氣氛很尷尬；約會結束前，我會主動收尾，暗示或提出下次再見面的可能」"),
    (13, Category::Mindset, "「被已讀、被拒絕或進展卡住時，我會難過一陣子，但還是有能力整理好情緒，在一段合理時間內恢復正常作息，而不是因一次失敗就長期停擺」"),
    (14, Category::Mindset, "「我很清楚戀愛中的掌控權必須在自己手上，我會為了打造理想的關係，努力讓自己更有魅力」"),
    (15, Category::Mindset, "「就算工作忙或心情不好，我仍能維持幾個最基本的行動習慣，例如定期剪頭髮、整理衣櫃、維持社交聯絡，而不是一忙就完全放掉好幾個月」"),
    (16, Category::Mindset, "「當我在同一個地方反覆卡關，例如聊到一個階段就冷掉，我會主動檢討原因，試著調整說話方式或做法」"),
];

pub const OPTIONS: [AnswerOption; 4] = [
    AnswerOption { label: "非常符合", value: 3 },
    AnswerOption { label: "有點符合", value: 2 },
    AnswerOption { label: "不太符合", value: 1 },
    AnswerOption { label: "完全沒有", value: 0 },
];

/// Label sent to the report generator for a question left unanswered.
pub const UNANSWERED_LABEL: &str = "未答";

pub fn category_description(category: Category) -> &'static str {
    match category {
        Category::Appearance => "這一區看的是：第一眼的外在印象。髮型、膚況、穿搭是否讓人一看就知道你有在打理自己。",
        Category::SocialPresence => "這一區看的是：在網路上的第一印象。頭貼、照片組合、版面乾淨度，能不能讓人一點進來就知道你是誰、值不值得多看一眼。",
        Category::Interaction => "這一區看的是：你有沒有把機會往前推。從認識新朋友、開啟聊天、提出邀約，到約會現場的互動與收尾。",
        Category::Mindset => "這一區看的是：你能不能長期投資自己，而不是一下衝高、一下躺平。遇到拒絕時的恢復力，以及願不願意調整做法。",
    }
}

pub fn category_suggestion(category: Category, level: Level) -> &'static str {
    match (category, level) {
        (Category::Appearance, Level::Red) => "現在的外在打理比較像『不要太邋遢就好』，對朋友來說可以，但對剛認識的女生來說，很容易第一眼就被刷掉。",
        (Category::Appearance, Level::Yellow) => "你已經有基本打理，但還不到『眼前一亮』的程度。只要在髮型、膚況或穿搭其中一兩項做升級，整體感覺會拉高很多。",
        (Category::Appearance, Level::Green) => "你的外在打理已經有一定水準，可以開始思考：怎麼把穿搭和氣質做出更清楚的風格感，讓人一眼記得你。",
        (Category::SocialPresence, Level::Red) => "現在的網路版面比較像『私人相簿』或『什麼都隨便丟』，女生點進來看不到重點，也很難分辨你是怎樣的人，很快就滑走。",
        (Category::SocialPresence, Level::Yellow) => "你已經有一些不錯的照片與內容，但整體還不夠聚焦，也夾雜幾張會拉低印象的東西。稍微整理頭貼與首頁可見內容，效果會直接提升。",
        (Category::SocialPresence, Level::Green) => "你的社群版面已經能幫你加分，女生只看照片與簡介就會想多認識你。接下來可以思考的是：怎麼讓版面講出更明確的故事與價值。",
        (Category::Interaction, Level::Red) => "問題不在你條件多差，而是你幾乎沒有在出手。很少主動開話題、少邀約、遇到機會容易退縮，讓很多本來可以發展的對象直接消失。",
        (Category::Interaction, Level::Yellow) => "你偶爾會主動，也有幾次成功約出來的經驗，但節奏不算穩定。有時聊太久不推進，有時約會後沒有好好收尾，導致關係停在模糊地帶。",
        (Category::Interaction, Level::Green) => "你願意主動，也大致懂得怎麼推進關係。接下來可以更細緻地調整約會品質與互動細節，讓對方更清楚感覺到『跟你在一起是舒服又有安全感的』。",
        (Category::Mindset, Level::Red) => "現在的狀態比較像『一受傷就全面關機』。一次拒絕就讓你停很久，很難維持基本自我打理與社交，久了會對自己越來越沒信心。",
        (Category::Mindset, Level::Yellow) => "你知道要進步，也偶爾會主動調整，但容易被工作、情緒或懶惰打斷。行動有一段一段的空窗期，讓成果很難累積起來。",
        (Category::Mindset, Level::Green) => "你已經有不錯的心理彈性，遇到挫折會難受，但仍能慢慢站起來、換方法再試。接下來要做的，是讓自己的成長計畫更有系統、更具體。",
    }
}

pub const PERSONAS: [Persona; 6] = [
    Persona {
        id: "charmer",
        title: "天生魅力家",
        subtitle: "情感與質感的完美平衡者",
        description: "你非常懂得如何展示自己的優點。無論是外在打理、社交媒體的呈現，還是與人互動的節奏感，你都能拿捏得恰到好處。對你來說，戀愛不是追逐，而是一場吸引力的博弈。",
        tags: &["高質感", "社交達人", "心理強大", "行動力滿格"],
    },
    Persona {
        id: "statue",
        title: "精緻的沈默者",
        subtitle: "萬事俱備，只差一個勇敢的開始",
        description: "你看起來無可挑剔，甚至在社群媒體上擁有不錯的人氣。但當進入實戰互動時，你往往會因為過度保護形象而顯得被動。你具備極佳的硬體條件，現在只需要學會如何「冒險」。",
        tags: &["外型優勢", "社群滿分", "行動遲疑", "偶像包袱"],
    },
    Persona {
        id: "hustler",
        title: "隱形的努力家",
        subtitle: "實力深藏不露，亟需視覺包裝",
        description: "你是一個非常有行動力且心態積極的人。在互動中你真誠且努力，但往往因為忽視了視覺第一印象而讓你在開局時困難重重。只要升級你的「包裝」，你的成功率將會倍增。",
        tags: &["實力派", "行動大師", "視覺盲點", "待磨練的鑽石"],
    },
    Persona {
        id: "neighbor",
        title: "溫暖的鄰家男孩",
        subtitle: "穩定可靠，但缺乏一點致命吸引力",
        description: "你在各方面都維持在平均水準。這讓你在朋友圈中很受歡迎，但在戀愛市場中卻容易被歸類為好人。你需要打破這份過於溫和的平衡，展現出更有侵略性或風格感的一面。",
        tags: &["親和力", "狀態穩定", "缺乏特色", "好人卡常客"],
    },
    Persona {
        id: "sage",
        title: "理論派大師",
        subtitle: "看透一切邏輯，卻未踏入戰場",
        description: "你對戀愛與心理學有深刻的見解。你懂得很多道理，甚至能給朋友建議，但你的生活圈過於狹窄，或者心態上過於謹慎，導致這些強大的知識儲備無處施展。",
        tags: &["智商高", "心態成熟", "社交圈窄", "實戰缺乏"],
    },
    Persona {
        id: "pioneer",
        title: "潛力無限的開拓者",
        subtitle: "黎明前的黑暗，正是蛻變的契機",
        description: "目前你在各個維度的指標都還在起步階段。這雖然代表你現在處於劣勢，但也意味著你擁有最大的成長空間。每一點微小的改變，都會讓你在魅力值上獲得巨大的回饋。",
        tags: &["新手村", "成長空間大", "亟需指引", "勇於嘗試"],
    },
];

pub struct Expert {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub cta_text: &'static str,
    pub cta_url: &'static str,
    /// Closing words for someone who is already the top persona.
    pub top_persona_note: &'static str,
}

pub const EXPERT: Expert = Expert {
    name: "形象教練 彭邦典",
    title: "自信魅力養成 / 脫單形象塑造",
    description: "如果你想快速改變，我把這幾年的教學經驗濃縮成一套5週、共10個小時的系統化陪跑訓練，陪普通男生學會打造有魅力的外型、塑造自信吸引力、讓女人忍不住多看你一眼，幫你跨出脫單的關鍵第一步。不過每個月只開放三個名額。",
    cta_text: "瞭解它怎麽幫助我",
    cta_url: "https://www.menspalais.com",
    top_persona_note: "彭教練對你唯一的建議是：好好善用這份天賦。祝你一帆風順！",
};

pub const DISCLAIMER: &str = "本測驗深度診斷由 AI 輔助生成，測驗結果僅供社交魅力提升參考。";

/// Narrative used when the report generator could not produce a report.
pub struct FallbackText {
    pub persona_explanation: &'static str,
    pub persona_overview: &'static str,
    pub appearance_analysis: &'static str,
    pub social_analysis: &'static str,
    pub interaction_analysis: &'static str,
    pub mindset_analysis: &'static str,
    pub coach_general_advice: &'static str,
}

pub const FALLBACK_TEXT: FallbackText = FallbackText {
    persona_explanation: "⚠️ AI 連線忙碌中，這是根據您的分數生成的基礎報告。",
    persona_overview: "您的魅力潛力巨大，建議稍後重新測驗再次進行深度分析。",
    appearance_analysis: "保持整潔，找出適合自己的風格是第一步。",
    social_analysis: "社群媒體是您的名片，試著多展現生活感。",
    interaction_analysis: "主動一點，故事就會開始。",
    mindset_analysis: "心態決定高度，保持自信。",
    coach_general_advice: "系統暫時無法連線至 AI 大腦，請稍後再試一次深度分析。",
};
