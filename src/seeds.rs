//! Built-in content: the seed catalog and the canned fallback problems.
//!
//! The seed catalog guarantees the app is useful even without CONTENT_DIR.
//! The canned problems are the absolute last resort when generation or
//! validation fails; they are hand-authored and never touch the pipeline.

use std::collections::BTreeMap;

use crate::catalog::ContentCatalog;
use crate::domain::{
  Genre, GeneratedProblem, LengthAdaptation, LengthClass, PassageBody, PassageKind, QuizQuestion,
  Speaker, Subtype, TextStructure, Topic, TrapPools,
};

fn topic(
  name: &str,
  description: &str,
  keywords: &[&str],
  levels: &[&str],
) -> Topic {
  Topic {
    name: name.into(),
    description: description.into(),
    keywords: keywords.iter().map(|k| (*k).into()).collect(),
    cultural_context: None,
    controversy_level: None,
    applicable_levels: levels.iter().map(|l| (*l).into()).collect(),
    weight: 1.0,
  }
}

fn subtype(
  label: &str,
  description: &str,
  question_focus: &str,
  genre_hint: &str,
  levels: &[&str],
  weight: f64,
) -> Subtype {
  Subtype {
    label: label.into(),
    description: description.into(),
    question_focus: question_focus.into(),
    vocabulary_level: "上級".into(),
    question_count: None,
    char_range: None,
    genre_hint: genre_hint.into(),
    characteristics: Vec::new(),
    example_topics: Vec::new(),
    applicable_levels: levels.iter().map(|l| (*l).into()).collect(),
    weight,
  }
}

/// Seed topics, grouped by category key.
fn seed_topics() -> BTreeMap<String, Vec<Topic>> {
  let mut map = BTreeMap::new();

  map.insert("society".into(), vec![
    {
      let mut t = topic(
        "少子高齢化と社会保障",
        "人口構造の変化が年金・医療・介護の制度に与える影響",
        &["高齢化率", "世代間格差", "持続可能性"],
        &["N1", "N2"],
      );
      t.controversy_level = Some("中".into());
      t
    },
    {
      let mut t = topic(
        "働き方の多様化",
        "終身雇用の揺らぎと副業・リモートワークの広がり",
        &["終身雇用", "成果主義", "ワークライフバランス"],
        &["N1", "N2"],
      );
      t.cultural_context = Some("日本的雇用慣行（年功序列・新卒一括採用）を前提とした議論が多い".into());
      t
    },
    topic(
      "情報社会とプライバシー",
      "個人データの利活用と監視への懸念のせめぎ合い",
      &["個人情報", "アルゴリズム", "監視社会"],
      &["N1"],
    ),
    topic(
      "地方の過疎化",
      "人口流出が進む地域の現状と再生の試み",
      &["限界集落", "地方創生", "Uターン"],
      &["N1", "N2"],
    ),
  ]);

  map.insert("science".into(), vec![
    topic(
      "人工知能と雇用",
      "自動化が労働市場にもたらす構造変化",
      &["機械学習", "省力化", "再教育"],
      &["N1"],
    ),
    {
      let mut t = topic(
        "生命科学と倫理",
        "遺伝子操作・再生医療をめぐる科学と倫理の緊張",
        &["ゲノム編集", "生命倫理", "インフォームド・コンセント"],
        &["N1"],
      );
      t.controversy_level = Some("高".into());
      t
    },
    topic(
      "再生可能エネルギーへの転換",
      "脱炭素社会に向けた技術的・経済的課題",
      &["太陽光", "送電網", "エネルギー安全保障"],
      &["N1", "N2"],
    ),
  ]);

  map.insert("culture".into(), vec![
    {
      let mut t = topic(
        "伝統工芸の継承",
        "後継者不足に直面する手仕事の現在",
        &["職人", "徒弟制", "産地"],
        &["N1", "N2"],
      );
      t.cultural_context = Some("「用の美」など民藝運動以来の美意識が評論の前提になりやすい".into());
      t
    },
    topic(
      "言葉の変化と規範",
      "「言葉の乱れ」論と言語の創造性",
      &["若者言葉", "敬語", "規範意識"],
      &["N1"],
    ),
    topic(
      "翻訳と文化",
      "翻訳不可能性をめぐる思考と異文化理解",
      &["意訳", "直訳", "文化的文脈"],
      &["N1"],
    ),
  ]);

  map.insert("daily".into(), vec![
    topic(
      "食品ロス削減",
      "家庭と流通の双方から考える食品廃棄の問題",
      &["賞味期限", "フードバンク", "消費行動"],
      &["N2", "N3"],
    ),
    topic(
      "キャッシュレス化する暮らし",
      "決済手段の変化と高齢者のデジタル格差",
      &["電子マネー", "ポイント経済", "デジタル格差"],
      &["N2"],
    ),
  ]);

  map
}

fn seed_genres() -> Vec<Genre> {
  vec![
    Genre {
      key: "hyoron".into(),
      label: "評論".into(),
      genre_type: "論説的文章".into(),
      characteristics: vec![
        "抽象度の高い概念を具体例で支える".into(),
        "譲歩と逆接による論理展開".into(),
        "筆者の主張は文末の断定・反語に集約される".into(),
      ],
      question_types: BTreeMap::from([
        ("主旨把握".into(), "筆者の最も言いたいことを選ぶ".into()),
        ("指示語".into(), "「それ」「この点」が指す内容を特定する".into()),
        ("理由説明".into(), "下線部のように筆者が述べる理由を選ぶ".into()),
      ]),
      vocabulary_focus: Some("漢語中心の抽象語彙（概念・構造・本質・契機など）".into()),
      grammar_style: Some("〜ざるを得ない、〜にほかならない、〜とは限らない等の硬い文末表現".into()),
      text_structure: Some(TextStructure {
        basic_flow: "問題提起→通念の提示→通念への反論→筆者の主張".into(),
        variation_patterns: vec![
          "具体例から入り一般化する帰納型".into(),
          "二項対立を立てて止揚する弁証法型".into(),
        ],
      }),
      length_adaptations: BTreeMap::from([
        ("short".into(), LengthAdaptation {
          focus: "一つの論点に絞る".into(),
          structure: "通念の提示と反転のみの二段構成".into(),
          question_emphasis: "主旨把握を中心に".into(),
        }),
        ("long".into(), LengthAdaptation {
          focus: "複数の具体例と反論の往復".into(),
          structure: "四段構成を維持しつつ譲歩節を厚くする".into(),
          question_emphasis: "段落間の論理関係を問う設問を含める".into(),
        }),
      ]),
      instructions: Some("主張を冒頭で明かさず、読者が論理を追って初めて結論に到達する構成にすること".into()),
    },
    Genre {
      key: "shosetsu".into(),
      label: "小説".into(),
      genre_type: "文学的文章".into(),
      characteristics: vec![
        "心情は直接述べず行動・風景描写に託す".into(),
        "会話文と地の文の視点の交錯".into(),
      ],
      question_types: BTreeMap::from([
        ("心情把握".into(), "登場人物の気持ちとして最も適当なものを選ぶ".into()),
        ("表現意図".into(), "描写が暗示する内容を読み取る".into()),
      ]),
      vocabulary_focus: Some("和語中心、オノマトペと慣用句".into()),
      grammar_style: None,
      text_structure: Some(TextStructure {
        basic_flow: "日常の場面→出来事→心情の揺れ→余韻".into(),
        variation_patterns: vec!["回想の挿入".into()],
      }),
      length_adaptations: BTreeMap::new(),
      instructions: None,
    },
    Genre {
      key: "shasetsu".into(),
      label: "社説・コラム".into(),
      genre_type: "時事的文章".into(),
      characteristics: vec![
        "時事的な出来事を手がかりに一般的な論点へ展開する".into(),
        "両論併記ののち一方にやや傾く結論".into(),
      ],
      question_types: BTreeMap::from([
        ("筆者の立場".into(), "筆者の立場に最も近いものを選ぶ".into()),
        ("内容合致".into(), "本文の内容と合うものを選ぶ".into()),
      ]),
      vocabulary_focus: Some("時事語彙と制度名".into()),
      grammar_style: Some("〜が求められる、〜ではないか等の提言調".into()),
      text_structure: None,
      length_adaptations: BTreeMap::new(),
      instructions: None,
    },
    Genre {
      key: "zuihitsu".into(),
      label: "随筆".into(),
      genre_type: "文学的文章".into(),
      characteristics: vec![
        "個人的体験から普遍的な気づきへ".into(),
        "断定を避けたやわらかい文末".into(),
      ],
      question_types: BTreeMap::from([
        ("主旨把握".into(), "筆者の気づきの内容を選ぶ".into()),
      ]),
      vocabulary_focus: None,
      grammar_style: None,
      text_structure: None,
      length_adaptations: BTreeMap::new(),
      instructions: None,
    },
    Genre {
      key: "jitsuyo".into(),
      label: "実用文".into(),
      genre_type: "情報検索".into(),
      characteristics: vec![
        "案内・規約・広告など複数の情報片".into(),
        "条件の組み合わせで答えが決まる".into(),
      ],
      question_types: BTreeMap::from([
        ("情報検索".into(), "条件に合う選択肢を資料から探す".into()),
      ]),
      vocabulary_focus: Some("掲示・規約で用いられる硬い定型表現".into()),
      grammar_style: None,
      text_structure: None,
      length_adaptations: BTreeMap::new(),
      instructions: Some("数値・日付・条件を複数含め、設問はその照合を要求すること".into()),
    },
  ]
}

fn seed_length_classes() -> Vec<LengthClass> {
  vec![
    LengthClass {
      key: "short".into(),
      label: "短文".into(),
      character_range: "200-400".into(),
      passage_kind: PassageKind::Single,
      possible_counts: vec![1, 2],
      count_weights: vec![3.0, 1.0],
      subtypes: vec![
        subtype("意見文", "筆者の主張が一点に絞られた短い評論", "主旨把握", "hyoron", &["N1", "N2"], 2.0),
        subtype("随筆風", "体験から気づきへ向かう短い随筆", "筆者の気づき", "zuihitsu", &["N1", "N2"], 1.0),
      ],
    },
    LengthClass {
      key: "medium".into(),
      label: "中文".into(),
      character_range: "500-700".into(),
      passage_kind: PassageKind::Single,
      possible_counts: vec![2, 3],
      count_weights: vec![2.0, 2.0],
      subtypes: vec![
        subtype("評論", "通念への反論を含む標準的な評論", "論理展開と主旨", "hyoron", &["N1"], 3.0),
        subtype("小説", "心情描写を中心とした小説の一場面", "心情把握", "shosetsu", &["N1", "N2"], 2.0),
        subtype("社説", "時事問題を扱う社説", "筆者の立場", "shasetsu", &["N1", "N2"], 2.0),
      ],
    },
    LengthClass {
      key: "long".into(),
      label: "長文".into(),
      character_range: "900-1200".into(),
      passage_kind: PassageKind::Single,
      possible_counts: vec![3, 4],
      count_weights: vec![3.0, 2.0],
      subtypes: vec![
        {
          let mut st = subtype("長文評論", "具体例と反論の往復を含む本格的な評論", "段落間の論理関係", "hyoron", &["N1"], 3.0);
          st.question_count = Some(4);
          st
        },
        subtype("小説", "場面の転換を含む小説", "心情の変化", "shosetsu", &["N1"], 1.0),
      ],
    },
    LengthClass {
      key: "comparative".into(),
      label: "統合理解".into(),
      character_range: "600-900".into(),
      passage_kind: PassageKind::Comparative,
      possible_counts: vec![2, 3],
      count_weights: vec![3.0, 1.0],
      subtypes: vec![
        subtype("対立意見", "同一の論点への賛成・反対の二文章", "共通点と相違点", "shasetsu", &["N1"], 2.0),
        subtype("視点比較", "同じ主題を異なる角度から論じる二文章", "視点の違い", "hyoron", &["N1"], 1.0),
      ],
    },
    LengthClass {
      key: "practical".into(),
      label: "情報検索".into(),
      character_range: "700-1000".into(),
      passage_kind: PassageKind::Practical,
      possible_counts: vec![2],
      count_weights: vec![1.0],
      subtypes: vec![
        subtype("案内文", "施設案内や募集要項などの複数資料", "条件の照合", "jitsuyo", &["N1", "N2"], 2.0),
        subtype("規約・注意書き", "規約と注意事項の組み合わせ", "例外条件の読み取り", "jitsuyo", &["N1"], 1.0),
      ],
    },
  ]
}

fn seed_speakers() -> Vec<Speaker> {
  vec![
    Speaker {
      id: "prof".into(),
      label: "大学教授（人文系）".into(),
      age_range: "50-60代".into(),
      writing_style: "抽象概念を定義しながら進める論証型".into(),
      vocabulary_level: "学術的".into(),
      tone: "慎重だが最終段落で強く断定する".into(),
      sentence_patterns: vec![
        "〜と考えられてきた。しかし、はたしてそうだろうか。".into(),
        "ここで注意すべきは、〜という点である。".into(),
        "〜にほかならない。".into(),
      ],
      applicable_levels: vec!["N1".into()],
      category: "academic".into(),
      sub_category: Some("humanities".into()),
    },
    Speaker {
      id: "essayist".into(),
      label: "エッセイスト".into(),
      age_range: "40代".into(),
      writing_style: "身辺の出来事から話を起こす随想型".into(),
      vocabulary_level: "一般".into(),
      tone: "やわらかく、断定を避ける".into(),
      sentence_patterns: vec![
        "ふと、〜ということに気づいた。".into(),
        "〜のかもしれない。".into(),
      ],
      applicable_levels: vec!["N1".into(), "N2".into()],
      category: "literary".into(),
      sub_category: None,
    },
    Speaker {
      id: "journalist".into(),
      label: "新聞記者".into(),
      age_range: "30-40代".into(),
      writing_style: "事実の提示から論点整理へ進む報道型".into(),
      vocabulary_level: "時事".into(),
      tone: "中立を装いつつ結論で提言する".into(),
      sentence_patterns: vec![
        "〜という調査結果がある。".into(),
        "いま求められているのは〜ではないか。".into(),
      ],
      applicable_levels: vec!["N1".into(), "N2".into()],
      category: "journalistic".into(),
      sub_category: None,
    },
    Speaker {
      id: "novelist".into(),
      label: "小説家".into(),
      age_range: "不定".into(),
      writing_style: "情景と心理の重ね合わせ".into(),
      vocabulary_level: "文学的".into(),
      tone: "静かで余韻を残す".into(),
      sentence_patterns: vec![
        "窓の外では、〜。".into(),
        "〜た。それだけのことだった。".into(),
      ],
      applicable_levels: vec!["N1".into()],
      category: "literary".into(),
      sub_category: Some("fiction".into()),
    },
  ]
}

fn seed_traps() -> TrapPools {
  TrapPools {
    opening: vec![
      "冒頭で世間の通念を筆者の意見であるかのように提示し、後段で覆す".into(),
      "冒頭の具体例を主張そのものと誤読しやすい形で置く".into(),
    ],
    middle: vec![
      "「確かに〜。しかし〜」の譲歩部分を選択肢の言い換えに使う".into(),
      "引用した他者の見解を筆者自身の見解と紛らわしく配置する".into(),
      "指示語が直前の文ではなく二文前の内容を指すようにする".into(),
    ],
    conclusion: vec![
      "結論を反語で述べ、表面的に読むと逆の意味に取れるようにする".into(),
      "条件付きの同意を全面的な賛成と誤読させる".into(),
    ],
    linguistic: vec![
      "二重否定（〜ないわけではない）を肯定の選択肢と並べる".into(),
      "「〜ざるを得ない」の消極的含意を欠いた言い換えを誤答に置く".into(),
      "「〜とは限らない」を全否定に言い換えた選択肢を混ぜる".into(),
    ],
  }
}

/// Assemble the full built-in catalog.
pub fn builtin_catalog() -> ContentCatalog {
  ContentCatalog {
    topics: seed_topics(),
    genres: seed_genres(),
    length_classes: seed_length_classes(),
    speakers: seed_speakers(),
    traps: seed_traps(),
  }
}

/// Default topic when no catalog category matches the requested levels.
pub fn default_topic() -> Topic {
  topic(
    "現代社会と技術",
    "技術の進歩が日常生活と社会制度に与える影響",
    &["技術革新", "社会変化"],
    &["N1", "N2", "N3"],
  )
}

/// Default genre when a subtype's hint cannot be resolved.
pub fn default_genre() -> Genre {
  seed_genres().into_iter().find(|g| g.key == "hyoron").expect("seed genres include hyoron")
}

fn q(question: &str, options: [&str; 4], correct: u8, explanation: &str) -> QuizQuestion {
  QuizQuestion {
    question: question.into(),
    options: options.iter().map(|o| (*o).into()).collect(),
    correct_answer: correct,
    explanation: explanation.into(),
  }
}

/// Hand-authored canned problem for a length class. Served with
/// `success:false` whenever generation or validation fails.
pub fn fallback_problem(length_key: &str, kind: PassageKind) -> GeneratedProblem {
  match (length_key, kind) {
    ("short", _) => GeneratedProblem {
      body: PassageBody::Single {
        passage: "読書の価値は、情報を得ることだけにあるのではない。書物を読むという行為は、他者の思考の筋道を自分の内部で辿り直すことであり、その過程で読み手自身の思考の枠組みが揺さぶられる。情報の断片なら検索すれば足りる時代だからこそ、一冊の本とじっくり向き合う時間は、自分の考えを根本から鍛え直す貴重な機会となるのである。".into(),
      },
      questions: vec![q(
        "筆者の考えに合うものはどれか。",
        [
          "読書の目的は効率よく情報を集めることである。",
          "読書は他者の思考を辿ることで自分の思考を鍛える行為である。",
          "検索技術の発達によって読書の価値は失われた。",
          "読書にかける時間はできるだけ短縮すべきである。",
        ],
        2,
        "The author values reading because retracing another person's reasoning reshapes the reader's own framework of thought, not because it is an efficient way to collect information.",
      )],
    },
    ("long", _) => GeneratedProblem {
      body: PassageBody::Single {
        passage: "言葉は変化するものである。かつて「正しい日本語」の乱れとして批判された言い回しの多くは、いまでは辞書に採録され、標準的な表現として定着している。とすれば、現在「乱れ」と呼ばれている若者言葉も、数十年後には標準となっている可能性が高い。もっとも、だからといって規範を教える必要がないということにはならない。規範は共通の土台として機能し、土台があるからこそ逸脱が表現として意味を持つのである。つまり、言葉の乱れを嘆く声と言葉の創造性とは、対立するものではなく、同じ現象の両面なのだ。言語教育に求められるのは、規範を絶対視することでも放棄することでもなく、変化を前提としたうえで共通の土台を更新し続ける柔軟さであろう。".into(),
      },
      questions: vec![
        q(
          "「乱れ」と呼ばれる表現について、筆者の考えに合うものはどれか。",
          [
            "標準となる可能性を持つ変化の一形態である。",
            "辞書に載るまでは使用を避けるべきものである。",
            "言語の衰退を示す明確な兆候である。",
            "教育によって完全に矯正できるものである。",
          ],
          1,
          "The author notes that many expressions once criticized as corruptions are now standard, so today's 'corrupted' usage is likely a stage of ordinary language change.",
        ),
        q(
          "筆者によれば、規範を教える意義は何か。",
          [
            "昔の正しい日本語を保存すること。",
            "逸脱が表現として意味を持つための共通の土台を与えること。",
            "若者言葉の使用を段階的に減らすこと。",
            "辞書の記述を統一すること。",
          ],
          2,
          "Norms matter as a shared foundation: deviation can function as expression only against that foundation, which is why teaching norms is still necessary.",
        ),
        q(
          "本文の主旨として最も適当なものはどれか。",
          [
            "言語教育は規範の絶対視をやめ、変化を前提に土台を更新し続けるべきだ。",
            "言葉の乱れを嘆く声は言語の創造性を損なうので控えるべきだ。",
            "言葉の変化は数十年単位でしか観察できない。",
            "規範と創造性は原理的に両立しない。",
          ],
          1,
          "The conclusion calls for flexibility in language education: neither absolutizing nor abandoning norms, but renewing the shared foundation on the premise of change.",
        ),
      ],
    },
    (_, PassageKind::Comparative) => GeneratedProblem {
      body: PassageBody::Comparative {
        passage_a: "在宅勤務は通勤時間をなくし、育児や介護と仕事の両立を可能にした。働く場所が自由になれば、都市への一極集中が和らぎ、地方に暮らしながら都市の仕事を続けることもできる。制度の定着こそが、働き方の選択肢を広げる鍵である。".into(),
        passage_b: "在宅勤務の利点は認めるが、職場には偶発的な会話から生まれる学びがある。特に経験の浅い社員は、先輩の仕事ぶりを見る機会を失いやすい。柔軟な制度を維持しつつも、週の一部は顔を合わせる仕組みを残すべきではないか。".into(),
      },
      questions: vec![
        q(
          "AとBに共通する認識はどれか。",
          [
            "在宅勤務には利点がある。",
            "在宅勤務は廃止すべきである。",
            "出社は週五日が望ましい。",
            "在宅勤務は地方には不向きである。",
          ],
          1,
          "A promotes remote work outright and B concedes its advantages before qualifying them, so both share the recognition that remote work has benefits.",
        ),
        q(
          "Bの筆者の主張として最も適当なものはどれか。",
          [
            "制度を柔軟に保ちながら、対面の機会も一部残すべきだ。",
            "経験の浅い社員だけ在宅勤務を禁止すべきだ。",
            "偶発的な会話は業務の妨げになる。",
            "在宅勤務の定着が一極集中を緩和する。",
          ],
          1,
          "B's conclusion is a qualified proposal: keep the flexible system but preserve some face-to-face time each week. Option 4 is A's argument, a typical lure.",
        ),
      ],
    },
    (_, PassageKind::Practical) => GeneratedProblem {
      body: PassageBody::Practical {
        passages: vec![
          "【市立図書館 利用案内】開館時間は午前9時から午後8時まで（土日祝は午後6時まで）。毎月第3月曜日は館内整理のため休館します。貸出は一人10冊まで、期間は2週間です。貸出の延長は、予約が入っていない資料に限り1回まで可能です。".into(),
          "【注意事項】視聴覚資料の貸出は一人5点までです。返却が遅れた場合は、遅れた日数と同じ日数のあいだ、新たな貸出を停止します。予約資料の取り置き期間は、連絡した日から1週間です。期間を過ぎた場合、予約は自動的に取り消されます。".into(),
        ],
      },
      questions: vec![
        q(
          "資料の返却が3日遅れた場合、どうなるか。",
          [
            "3日間、新たな貸出ができなくなる。",
            "1週間、新たな貸出ができなくなる。",
            "視聴覚資料のみ借りられなくなる。",
            "貸出冊数が5冊に制限される。",
          ],
          1,
          "The notice says lending is suspended for the same number of days as the delay, so a three-day delay means a three-day suspension.",
        ),
        q(
          "貸出の延長ができるのはどのような場合か。",
          [
            "予約が入っていない資料について1回まで。",
            "どの資料でも2回まで。",
            "視聴覚資料についてのみ。",
            "休館日をはさむ場合のみ。",
          ],
          1,
          "The guide limits renewal to one time and only for items with no outstanding reservations.",
        ),
      ],
    },
    _ => GeneratedProblem {
      body: PassageBody::Single {
        passage: "人工知能の進歩が雇用を奪うという議論は珍しくない。しかし歴史を振り返れば、技術革新はつねに仕事の形を変えてきたのであって、仕事そのものを消し去ったわけではない。問題は変化の速さである。従来の技術転換は一世代をかけて進んだため、人々は徐々に新しい技能を身につけることができた。これに対して今日の変化は数年単位で起こる。したがって問われているのは、機械に仕事を奪われるか否かではなく、社会が再教育の仕組みをどれだけ迅速に整えられるかなのである。".into(),
      },
      questions: vec![
        q(
          "筆者によれば、今日の技術革新が従来と異なる点は何か。",
          [
            "仕事そのものを消し去ること。",
            "変化が数年単位という速さで起こること。",
            "一世代をかけて緩やかに進むこと。",
            "雇用にまったく影響しないこと。",
          ],
          2,
          "The author contrasts past transitions, which unfolded over a generation, with today's changes that occur within a few years. Speed is the difference, not the disappearance of work itself.",
        ),
        q(
          "本文の主旨として最も適当なものはどれか。",
          [
            "社会が再教育の仕組みを迅速に整えられるかが問われている。",
            "機械に仕事を奪われることは避けられない。",
            "技術革新は過去に仕事を消し去ってきた。",
            "変化の速さは問題ではない。",
          ],
          1,
          "The concluding sentence reframes the question: what matters is how quickly society can build retraining systems, not whether machines take jobs.",
        ),
      ],
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fallback_problems_are_well_formed_for_every_class() {
    for (key, kind) in [
      ("short", PassageKind::Single),
      ("medium", PassageKind::Single),
      ("long", PassageKind::Single),
      ("comparative", PassageKind::Comparative),
      ("practical", PassageKind::Practical),
    ] {
      let p = fallback_problem(key, kind);
      assert!(!p.questions.is_empty(), "{key} fallback has no questions");
      for question in &p.questions {
        assert_eq!(question.options.len(), 4);
        assert!((1..=4).contains(&question.correct_answer));
        assert!(!question.explanation.is_empty());
      }
      assert!(p.body.char_count() > 0);
    }
  }

  #[test]
  fn fallback_body_matches_requested_kind() {
    assert!(matches!(
      fallback_problem("comparative", PassageKind::Comparative).body,
      PassageBody::Comparative { .. }
    ));
    assert!(matches!(
      fallback_problem("practical", PassageKind::Practical).body,
      PassageBody::Practical { .. }
    ));
    assert!(matches!(
      fallback_problem("medium", PassageKind::Single).body,
      PassageBody::Single { .. }
    ));
  }
}
