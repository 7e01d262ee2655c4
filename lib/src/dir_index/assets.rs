// Spliced into markdown like the board assets: no blank lines.

pub const STYLE: &str = r#"<style>
.di-wrap{margin:.4rem 0 1rem}
.di-controls{display:flex;flex-wrap:wrap;gap:10px;align-items:center;margin:.2rem 0 .65rem}
.di-field{display:flex;align-items:center;gap:8px;border:1px solid rgba(0,0,0,.12);background:rgba(255,255,255,.75);border-radius:14px;padding:.4rem .55rem}
[data-md-color-scheme="slate"] .di-field{border-color:rgba(255,255,255,.12);background:rgba(255,255,255,.06)}
.di-field label{font-size:.84rem;opacity:.85;white-space:nowrap}
.di-input,.di-select{border:0;outline:none;background:transparent;color:inherit;font-size:.92rem;min-width:150px}
.di-tagbar{display:flex;flex-wrap:wrap;gap:8px;margin-bottom:.65rem}
.di-tag{border-radius:999px;border:1px solid rgba(0,0,0,.12);padding:.18rem .55rem;font-size:.84rem;background:transparent;color:inherit;cursor:pointer;opacity:.7}
.di-tag.is-active{opacity:1;background:var(--tg-bg);color:var(--tg-fg);border-color:var(--tg-fg)}
.di-list{display:flex;flex-direction:column;gap:8px}
.di-card{display:block;border:1px solid rgba(0,0,0,.12);border-radius:12px;padding:.55rem .7rem;text-decoration:none;color:inherit}
[data-md-color-scheme="slate"] .di-card{border-color:rgba(255,255,255,.12)}
.di-title{font-weight:700}
.di-meta{display:flex;flex-wrap:wrap;gap:6px;margin-top:.3rem}
.di-chip{font-size:.79rem;padding:.1rem .48rem;border-radius:999px;border:1px solid rgba(0,0,0,.12)}
.di-hidden{display:none !important}
.di-empty{opacity:.6;text-align:center;padding:.9rem 0}
</style>"#;

pub const SCRIPT: &str = r#"<script>
(function(){
  const wrap = document.currentScript.closest('[data-di-wrap]');
  if(!wrap) return;
  const field = name => wrap.querySelector('[data-di-filter="' + name + '"]');
  const q = field('q'), status = field('status'), from = field('from'), to = field('to');
  const cards = Array.from(wrap.querySelectorAll('.di-card'));
  const empty = wrap.querySelector('[data-di-empty]');
  const activeTags = new Set();
  const list = (el, name) => (el.getAttribute(name) || '').split(',').filter(Boolean);
  function day(s){
    const m = /^(\d{4})-(\d{2})-(\d{2})$/.exec(s || '');
    return m ? new Date(+m[1], +m[2] - 1, +m[3]).getTime() : null;
  }
  function apply(){
    const needle = (q && q.value || '').trim().toLowerCase();
    const st = status ? status.value : '';
    const lo = from ? day(from.value) : null, hi = to ? day(to.value) : null;
    let visible = 0;
    cards.forEach(card => {
      const title = (card.getAttribute('data-title') || '').toLowerCase();
      const hasDates = card.getAttribute('data-hasdates') === '1';
      let ok = !needle || title.includes(needle);
      if(ok && activeTags.size) ok = list(card, 'data-tags').some(t => activeTags.has(t));
      if(ok && st === 'nodate') ok = !hasDates;
      else if(ok && (lo !== null || hi !== null)) ok = hasDates && list(card, 'data-dates').some(d => {
        const t = day(d);
        return t !== null && (lo === null || t >= lo) && (hi === null || t <= hi);
      });
      else if(ok && st) ok = list(card, 'data-statuses').includes(st);
      card.classList.toggle('di-hidden', !ok);
      if(ok) visible++;
    });
    if(empty) empty.style.display = visible ? 'none' : 'block';
  }
  wrap.querySelectorAll('[data-di-tag]').forEach(btn => btn.addEventListener('click', () => {
    const tag = btn.getAttribute('data-di-tag');
    if(activeTags.has(tag)) activeTags.delete(tag); else activeTags.add(tag);
    btn.classList.toggle('is-active', activeTags.has(tag));
    apply();
  }));
  if(q) q.addEventListener('input', apply);
  [status, from, to].forEach(el => el && el.addEventListener('change', apply));
  apply();
})();
</script>"#;
